//! Conversion between decimal degrees and the degrees/minutes/seconds form used by EXIF GPS tags.

use serde::Serialize;
use std::fmt;

/// Number of decimals seconds are rounded to.
pub const SECONDS_DECIMALS: i32 = 5;

/// Hemisphere labels for negative and positive values of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HemisphereRefs {
    pub negative: &'static str,
    pub positive: &'static str,
}

pub const LATITUDE_REFS: HemisphereRefs = HemisphereRefs {
    negative: "S",
    positive: "N",
};

pub const LONGITUDE_REFS: HemisphereRefs = HemisphereRefs {
    negative: "W",
    positive: "E",
};

/// How the seconds component is rounded on exact halves.
///
/// `HalfEven` (banker's rounding) is the default: `0.125` at two decimals becomes
/// `0.12`. `HalfAwayFromZero` turns the same value into `0.13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingMode {
    #[default]
    HalfEven,
    HalfAwayFromZero,
}

impl RoundingMode {
    /// Rounds `value` to `decimals` decimal places.
    pub fn round(self, value: f64, decimals: i32) -> f64 {
        let scale = 10f64.powi(decimals);
        let scaled = value * scale;
        let rounded = match self {
            Self::HalfEven => scaled.round_ties_even(),
            Self::HalfAwayFromZero => scaled.round(),
        };
        rounded / scale
    }
}

/// A coordinate as degrees, minutes, seconds and hemisphere reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DmsCoordinate {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
    /// `"N"`/`"S"` or `"E"`/`"W"`; empty for a value of exactly zero.
    pub reference: String,
}

/// Formats as `"D M S"`, the value syntax exiftool accepts for `GPSLatitude`/`GPSLongitude`.
impl fmt::Display for DmsCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.degrees, self.minutes, self.seconds)
    }
}

/// Converts signed decimal degrees into a [`DmsCoordinate`].
///
/// Degrees and minutes are truncated, seconds are rounded to [`SECONDS_DECIMALS`]
/// places with `rounding`.
///
/// Seconds that round up to 60 carry into the minutes, and minutes into the
/// degrees. The plain truncate-then-round formula would instead produce a
/// non-canonical triple: `2.9` gives `2 53 60` there but `2 54 0` here. Both
/// describe the same position.
pub fn to_dms(value: f64, refs: HemisphereRefs, rounding: RoundingMode) -> DmsCoordinate {
    let reference = if value < 0.0 {
        refs.negative
    } else if value > 0.0 {
        refs.positive
    } else {
        ""
    };

    let abs_value = value.abs();
    let degrees = abs_value.trunc();
    let total_minutes = (abs_value - degrees) * 60.0;
    let minutes = total_minutes.trunc();
    let seconds = rounding.round((total_minutes - minutes) * 60.0, SECONDS_DECIMALS);

    let (mut degrees, mut minutes, mut seconds) = (degrees as u32, minutes as u32, seconds);
    if seconds >= 60.0 {
        seconds -= 60.0;
        minutes += 1;
    }
    if minutes >= 60 {
        minutes -= 60;
        degrees += 1;
    }

    DmsCoordinate {
        degrees,
        minutes,
        seconds,
        reference: reference.to_string(),
    }
}

/// Converts a [`DmsCoordinate`] back into signed decimal degrees.
pub fn to_decimal(dms: &DmsCoordinate, refs: HemisphereRefs) -> f64 {
    let magnitude =
        f64::from(dms.degrees) + f64::from(dms.minutes) / 60.0 + dms.seconds / 3600.0;
    if dms.reference == refs.negative {
        -magnitude
    } else {
        magnitude
    }
}
