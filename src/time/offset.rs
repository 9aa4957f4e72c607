//! Conversion of local timestamps with a signed `±HH:MM` offset into naive UTC.

use super::error::TimeError;
use super::parsing::parse_offset_string;
use chrono::{DateTime, FixedOffset, NaiveDateTime, SubsecRound, TimeDelta};

/// Converts a compact offset (`+0200`) into the colon form (`+02:00`).
///
/// Offsets that already contain a colon, or are too short to carry minutes, are
/// returned unchanged.
pub fn normalize_offset(offset: &str) -> String {
    let offset = offset.trim();
    if offset.contains(':') || offset.len() < 3 || !offset.is_ascii() {
        return offset.to_string();
    }
    let (head, tail) = offset.split_at(offset.len() - 2);
    format!("{head}:{tail}")
}

/// The `±HH:MM` offset embedded in an aware timestamp.
pub fn offset_string(datetime: &DateTime<FixedOffset>) -> String {
    datetime.format("%:z").to_string()
}

/// Converts a local time into a timezone-naive UTC time.
///
/// With an offset, `utc = local - offset`. Without one (or with an empty string)
/// the input is taken to already be UTC. Sub-seconds are truncated in both cases.
pub fn convert_to_utc(local: NaiveDateTime, offset: Option<&str>) -> Result<NaiveDateTime, TimeError> {
    let utc = match offset.map(str::trim).filter(|o| !o.is_empty()) {
        Some(offset) => {
            let seconds = parse_offset_string(&normalize_offset(offset))
                .map_err(|_| TimeError::InvalidOffset(offset.to_string()))?;
            local
                .checked_sub_signed(TimeDelta::seconds(i64::from(seconds)))
                .ok_or_else(|| TimeError::InvalidTimestamp(local.to_string()))?
        }
        None => local,
    };
    Ok(utc.trunc_subsecs(0))
}

/// Naive UTC time of an aware timestamp, converted through its own embedded offset.
pub fn to_naive_utc(datetime: &DateTime<FixedOffset>) -> Result<NaiveDateTime, TimeError> {
    convert_to_utc(datetime.naive_local(), Some(&offset_string(datetime)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_history_timestamp;
    use chrono::NaiveDate;

    fn naive(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_normalize_offset() {
        assert_eq!(normalize_offset("+0200"), "+02:00");
        assert_eq!(normalize_offset("-0530"), "-05:30");
        assert_eq!(normalize_offset("+02:00"), "+02:00");
        assert_eq!(normalize_offset("Z"), "Z");
    }

    #[test]
    fn test_positive_offset_is_subtracted() {
        let utc = convert_to_utc(naive(9, 0, 0), Some("+02:00")).unwrap();
        assert_eq!(utc, naive(7, 0, 0));
    }

    #[test]
    fn test_negative_offset_is_added() {
        let utc = convert_to_utc(naive(9, 0, 0), Some("-03:30")).unwrap();
        assert_eq!(utc, naive(12, 30, 0));
    }

    #[test]
    fn test_compact_offset_is_normalized() {
        let utc = convert_to_utc(naive(9, 0, 0), Some("+0545")).unwrap();
        assert_eq!(utc, naive(3, 15, 0));
    }

    #[test]
    fn test_missing_offset_means_utc() {
        assert_eq!(convert_to_utc(naive(9, 0, 0), None).unwrap(), naive(9, 0, 0));
        assert_eq!(convert_to_utc(naive(9, 0, 0), Some("")).unwrap(), naive(9, 0, 0));
    }

    #[test]
    fn test_offset_crosses_midnight() {
        let utc = convert_to_utc(naive(1, 0, 0), Some("+02:00")).unwrap();
        assert_eq!(
            utc,
            NaiveDate::from_ymd_opt(2023, 12, 31)
                .unwrap()
                .and_hms_opt(23, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_subseconds_are_truncated_not_rounded() {
        let local = naive(9, 0, 0) + TimeDelta::milliseconds(999);
        let utc = convert_to_utc(local, Some("+01:00")).unwrap();
        assert_eq!(utc, naive(8, 0, 0));

        let utc = convert_to_utc(local, None).unwrap();
        assert_eq!(utc, naive(9, 0, 0));
    }

    #[test]
    fn test_invalid_offset() {
        assert_eq!(
            convert_to_utc(naive(9, 0, 0), Some("two hours")),
            Err(TimeError::InvalidOffset("two hours".to_string()))
        );
    }

    #[test]
    fn test_to_naive_utc_uses_embedded_offset() {
        let start = parse_history_timestamp("2024-01-01T09:00:00.000+02:00").unwrap();
        assert_eq!(offset_string(&start), "+02:00");
        assert_eq!(to_naive_utc(&start).unwrap(), naive(7, 0, 0));

        let zulu = parse_history_timestamp("2024-01-01T09:00:00.500Z").unwrap();
        assert_eq!(offset_string(&zulu), "+00:00");
        assert_eq!(to_naive_utc(&zulu).unwrap(), naive(9, 0, 0));
    }
}
