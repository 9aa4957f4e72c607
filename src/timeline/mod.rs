//! Location-history normalization and nearest-timestamp lookup.
pub mod error;
mod geo_point;
mod matcher;
mod normalize;
pub mod structs;

pub use geo_point::parse_geo_point;
pub use matcher::{TieBreak, Timeline};
pub use normalize::{NormalizedHistory, SkippedRecord, load_history, normalize_history};
