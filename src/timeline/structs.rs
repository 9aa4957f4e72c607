use crate::timeline::error::TimelineError;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which part of the location history a sample was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Timeline,
    ActivityStart,
    ActivityEnd,
    VisitStart,
    VisitEnd,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Timeline => "timeline",
            Self::ActivityStart => "activity_start",
            Self::ActivityEnd => "activity_end",
            Self::VisitStart => "visit_start",
            Self::VisitEnd => "visit_end",
        };
        f.write_str(name)
    }
}

/// A single point in time and space, in UTC.
///
/// Two notions of sameness exist and are kept apart:
/// * ordering only looks at [`LocationSample::sort_key`], the timestamp;
/// * `PartialEq` compares every field.
///
/// Samples sharing a timestamp but not a coordinate therefore sort as equals but
/// are never equal values, so deduplicating on `==` cannot drop a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    /// Timezone-naive UTC instant, second precision.
    pub timestamp_utc: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    /// Provenance only, never used for matching.
    pub source_kind: Option<SourceKind>,
}

impl LocationSample {
    pub fn new(
        timestamp_utc: NaiveDateTime,
        latitude: f64,
        longitude: f64,
        source_kind: Option<SourceKind>,
    ) -> Self {
        Self {
            timestamp_utc,
            latitude,
            longitude,
            source_kind,
        }
    }

    /// The key timelines are sorted and searched by.
    pub const fn sort_key(&self) -> NaiveDateTime {
        self.timestamp_utc
    }

    /// Absolute time between this sample and `instant`.
    pub fn time_distance(&self, instant: NaiveDateTime) -> TimeDelta {
        (self.timestamp_utc - instant).abs()
    }
}

impl fmt::Display for LocationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location({}, {}, {}",
            self.timestamp_utc, self.latitude, self.longitude
        )?;
        if let Some(kind) = self.source_kind {
            write!(f, ", {kind}")?;
        }
        f.write_str(")")
    }
}

// --- Location-history document as exported by Google Maps Timeline ---

/// One entry of the history export, before its shape is known.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHistoryRecord {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub timeline_path: Option<Vec<RawPathPoint>>,
    pub activity: Option<RawActivity>,
    pub visit: Option<RawVisit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPathPoint {
    pub point: String,
    #[serde(deserialize_with = "deserialize_minutes")]
    pub duration_minutes_offset_from_start_time: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawActivity {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVisit {
    pub top_candidate: RawTopCandidate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTopCandidate {
    pub place_location: String,
}

/// A history record whose shape has been identified.
#[derive(Debug, Clone)]
pub enum HistoryRecord {
    /// Raw GPS trace; `start_time` is already UTC.
    TimelinePath {
        start_time: String,
        points: Vec<RawPathPoint>,
    },
    /// A movement between two places, timestamps in local time.
    Activity {
        start_time: String,
        end_time: String,
        start: String,
        end: String,
    },
    /// A stay at a single place, timestamps in local time.
    Visit {
        start_time: String,
        end_time: String,
        place_location: String,
    },
}

impl RawHistoryRecord {
    /// Identifies the record shape.
    ///
    /// `Ok(None)` means none of `timelinePath`, `activity` or `visit` is present.
    /// When several are, the first in that order wins.
    pub fn into_record(self) -> Result<Option<HistoryRecord>, TimelineError> {
        let Self {
            start_time,
            end_time,
            timeline_path,
            activity,
            visit,
        } = self;

        if timeline_path.is_none() && activity.is_none() && visit.is_none() {
            return Ok(None);
        }
        let start_time = start_time.ok_or(TimelineError::MissingField("startTime"))?;

        if let Some(points) = timeline_path {
            return Ok(Some(HistoryRecord::TimelinePath { start_time, points }));
        }

        let end_time = end_time.ok_or(TimelineError::MissingField("endTime"))?;
        let record = match (activity, visit) {
            (Some(activity), _) => HistoryRecord::Activity {
                start_time,
                end_time,
                start: activity.start,
                end: activity.end,
            },
            (None, Some(visit)) => HistoryRecord::Visit {
                start_time,
                end_time,
                place_location: visit.top_candidate.place_location,
            },
            (None, None) => return Ok(None),
        };
        Ok(Some(record))
    }
}

/// The export writes minute offsets as strings ("12"); older files use numbers.
fn deserialize_minutes<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Minutes {
        Number(i64),
        Text(String),
    }

    match Minutes::deserialize(deserializer)? {
        Minutes::Number(minutes) => Ok(minutes),
        Minutes::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}
