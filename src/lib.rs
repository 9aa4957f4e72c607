//! # Timeline Geotag
//!
//! Back-fill GPS coordinates into photos from a Google Maps Timeline export.
//!
//! Every photo's capture time is converted to UTC and matched against the nearest
//! point of the location history. When that point is close enough in time, its
//! coordinates are written into the photo's EXIF GPS tags through `exiftool`.
//!
//! ## Key Features
//!
//! - **Timeline Parsing**: Reads `timelinePath`, `activity` and `visit` records and merges them into one sorted UTC timeline.
//! - **Capture Time**: Combines `DateTimeOriginal` with `OffsetTimeOriginal` to get the photo's UTC instant.
//! - **Nearest Match**: Binary search for the closest location sample, with a configurable tolerance.
//! - **GPS Encoding**: Converts decimal degrees to degrees, minutes and seconds with hemisphere references.
//! - **Parallel Batches**: Processes a whole folder, starting at most one `exiftool` process per worker thread.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use timeline_geotag::{BatchSummary, Geotagger, list_photos, load_history};
//!
//! fn main() -> color_eyre::Result<()> {
//!     let geotagger = Geotagger::builder().dry_run(true).build();
//!     geotagger.check_exiftool()?;
//!
//!     let history = load_history(Path::new("location-history.json"))?;
//!     let photos = list_photos(Path::new("photos"), true, false)?;
//!     let reports = geotagger.geotag_photos(&history.timeline, &photos)?;
//!
//!     let summary = BatchSummary::from_reports(&reports);
//!     println!("Tagged {} of {} photos", summary.dry_run, summary.total);
//!
//!     Ok(())
//! }
//! ```

mod error;
mod geotagger;
pub mod gps;
pub mod metadata;
pub mod structs;
pub mod time;
pub mod timeline;
pub mod utils;

pub use error::GeotagError;
pub use geotagger::Geotagger;
pub use gps::{DmsCoordinate, RoundingMode, to_dms};
pub use structs::{BatchSummary, GpsMatch, PhotoOutcome, PhotoReport, ProcessedPhoto};
pub use timeline::structs::LocationSample;
pub use timeline::{NormalizedHistory, TieBreak, Timeline, load_history, normalize_history};
pub use utils::list_photos;
