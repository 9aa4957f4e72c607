use thiserror::Error;

/// The primary error type for the timeline-geotag crate.
#[derive(Error, Debug)]
pub enum GeotagError {
    #[error("Location timeline error: {0}")]
    Timeline(#[from] crate::timeline::error::TimelineError),

    #[error("Capture time conversion failed: {0}")]
    Time(#[from] crate::time::error::TimeError),

    #[error("Photo metadata error: {0}")]
    Metadata(#[from] crate::metadata::error::MetadataError),

    // --- Batch-level errors ---
    #[error("Metadata service could not be started: {0}")]
    ServiceUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to list photos: {0}")]
    Walk(#[from] walkdir::Error),
}
