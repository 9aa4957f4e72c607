//! Reading capture times from, and writing GPS tags to, photo files.
pub mod error;
mod exiftool_service;
mod structs;

pub use exiftool_service::{ExifToolService, parse_capture_metadata};
pub use structs::CaptureMetadata;

use crate::gps::DmsCoordinate;
use error::MetadataError;
use std::path::Path;

/// Access to a photo's embedded metadata, keyed by file path.
///
/// Implementations are used from one thread at a time; the batch driver creates
/// one instance per worker thread.
pub trait MetadataService {
    /// Reads the original capture time, its UTC offset and whether GPS is already set.
    fn read_capture(&mut self, photo: &Path) -> Result<CaptureMetadata, MetadataError>;

    /// Writes latitude and longitude (with their hemisphere references) into the photo.
    fn write_gps(
        &mut self,
        photo: &Path,
        latitude: &DmsCoordinate,
        longitude: &DmsCoordinate,
    ) -> Result<(), MetadataError>;
}
