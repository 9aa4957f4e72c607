//! Timestamp parsing and local-time to UTC conversion.
pub mod error;
mod offset;
mod parsing;

pub use offset::{convert_to_utc, normalize_offset, offset_string, to_naive_utc};
pub use parsing::{parse_exif_naive, parse_history_timestamp, parse_offset_string};
