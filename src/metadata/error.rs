use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Exiftool failed to execute or process the file")]
    Exiftool(#[from] exiftool::ExifToolError),

    #[error("Capture time fields are missing or ambiguous: {0}")]
    AmbiguousMetadataFields(String),

    #[error("Failed to write GPS tags: {0}")]
    WriteFailed(String),
}
