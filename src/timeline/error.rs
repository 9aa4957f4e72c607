use crate::time::error::TimeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("Malformed geo-point: {0:?}")]
    MalformedGeoPoint(String),

    #[error("Timestamp conversion failed: {0}")]
    Time(#[from] TimeError),

    #[error("Record is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Record has an unexpected structure: {0}")]
    InvalidRecord(String),

    #[error("The location timeline is empty; build it before matching")]
    EmptyTimeline,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Location history is not a JSON array of records: {0}")]
    Json(#[from] serde_json::Error),
}
