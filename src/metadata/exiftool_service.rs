use super::MetadataService;
use super::error::MetadataError;
use super::structs::CaptureMetadata;
use crate::gps::DmsCoordinate;
use crate::time::parse_exif_naive;
use exiftool::ExifTool;
use serde_json::Value;
use std::path::Path;

/// Tags needed to decide whether and where to geotag a photo.
const READ_ARGS: [&str; 6] = [
    "-n",
    "-DateTimeOriginal",
    "-SubSecTimeOriginal",
    "-OffsetTimeOriginal",
    "-GPSLatitude",
    "-GPSLongitude",
];

/// [`MetadataService`] backed by a long-running `exiftool` process.
pub struct ExifToolService {
    exiftool: ExifTool,
}

impl ExifToolService {
    /// Starts `exiftool`, from `exiftool_path` if given, otherwise from `PATH`.
    ///
    /// # Errors
    ///
    /// [`MetadataError::Exiftool`] if the executable cannot be found or fails to start.
    pub fn new(exiftool_path: Option<&Path>) -> Result<Self, MetadataError> {
        let exiftool = match exiftool_path {
            Some(path) => ExifTool::with_executable(path)?,
            None => ExifTool::new()?,
        };
        Ok(Self { exiftool })
    }

    /// The version string reported by `exiftool -ver`.
    pub fn version(&mut self) -> Result<String, MetadataError> {
        let output = self.exiftool.execute_raw(&["-ver"])?;
        Ok(String::from_utf8_lossy(&output).trim().to_string())
    }
}

impl MetadataService for ExifToolService {
    fn read_capture(&mut self, photo: &Path) -> Result<CaptureMetadata, MetadataError> {
        let exif = self.exiftool.json(photo, &READ_ARGS)?;
        parse_capture_metadata(&exif)
    }

    fn write_gps(
        &mut self,
        photo: &Path,
        latitude: &DmsCoordinate,
        longitude: &DmsCoordinate,
    ) -> Result<(), MetadataError> {
        let photo_arg = photo.to_str().ok_or_else(|| {
            MetadataError::WriteFailed(format!("path {} is not valid UTF-8", photo.display()))
        })?;
        let args = gps_write_args(latitude, longitude, photo_arg);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.exiftool.execute_raw(args.as_slice())?;
        Ok(())
    }
}

fn gps_write_args(latitude: &DmsCoordinate, longitude: &DmsCoordinate, photo: &str) -> Vec<String> {
    vec![
        "-overwrite_original".to_string(),
        format!("-GPSLatitude={latitude}"),
        format!("-GPSLatitudeRef={}", latitude.reference),
        format!("-GPSLongitude={longitude}"),
        format!("-GPSLongitudeRef={}", longitude.reference),
        photo.to_string(),
    ]
}

fn get_string(exif: &Value, key: &str) -> Option<String> {
    match exif.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Builds [`CaptureMetadata`] from exiftool's numeric (`-n`) JSON output.
///
/// # Errors
///
/// [`MetadataError::AmbiguousMetadataFields`] when `DateTimeOriginal` is missing
/// or not a valid timestamp.
pub fn parse_capture_metadata(exif: &Value) -> Result<CaptureMetadata, MetadataError> {
    let raw_date = get_string(exif, "DateTimeOriginal").ok_or_else(|| {
        MetadataError::AmbiguousMetadataFields("DateTimeOriginal is missing".to_string())
    })?;
    let date_time_original = parse_exif_naive(&raw_date).ok_or_else(|| {
        MetadataError::AmbiguousMetadataFields(format!(
            "DateTimeOriginal {raw_date:?} is not a timestamp"
        ))
    })?;

    let has_gps = exif.get("GPSLatitude").and_then(Value::as_f64).is_some()
        || exif.get("GPSLongitude").and_then(Value::as_f64).is_some();

    Ok(CaptureMetadata {
        date_time_original,
        sub_sec_time_original: get_string(exif, "SubSecTimeOriginal"),
        offset_time_original: get_string(exif, "OffsetTimeOriginal"),
        has_gps,
    })
}
