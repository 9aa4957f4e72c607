use crate::time::convert_to_utc;
use crate::time::error::TimeError;
use chrono::NaiveDateTime;

/// Capture-time fields of a photo as stored by the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureMetadata {
    /// `DateTimeOriginal`, camera-local wall clock.
    pub date_time_original: NaiveDateTime,
    /// `SubSecTimeOriginal`, kept for reporting; matching works at second precision.
    pub sub_sec_time_original: Option<String>,
    /// `OffsetTimeOriginal`, e.g. `"+02:00"`. Absent means the clock was set to UTC.
    pub offset_time_original: Option<String>,
    /// Whether `GPSLatitude` or `GPSLongitude` is already present.
    pub has_gps: bool,
}

impl CaptureMetadata {
    /// The capture instant as a naive UTC timestamp, the lookup key into a timeline.
    pub fn utc_timestamp(&self) -> Result<NaiveDateTime, TimeError> {
        convert_to_utc(self.date_time_original, self.offset_time_original.as_deref())
    }
}
