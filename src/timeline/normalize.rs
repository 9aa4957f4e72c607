//! Turns a Google Maps Timeline export into a single sorted UTC [`Timeline`].

use super::error::TimelineError;
use super::geo_point::parse_geo_point;
use super::matcher::Timeline;
use super::structs::{HistoryRecord, LocationSample, RawHistoryRecord, RawPathPoint, SourceKind};
use crate::time::{parse_history_timestamp, to_naive_utc};
use chrono::{NaiveDateTime, SubsecRound, TimeDelta};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// A record that was dropped during normalization, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record in the input document.
    pub index: usize,
    pub reason: String,
}

/// Result of normalizing a location-history document.
#[derive(Debug, Clone)]
pub struct NormalizedHistory {
    pub timeline: Timeline,
    /// Records that had a known shape but could not be converted.
    pub skipped: Vec<SkippedRecord>,
    /// Records without `timelinePath`, `activity` or `visit`; dropped silently.
    pub unrecognized: usize,
}

/// Reads a location-history JSON file (a top-level array of records) and normalizes it.
///
/// # Errors
///
/// Only if the file cannot be read or is not a JSON array. Individual bad records
/// are skipped and listed in [`NormalizedHistory::skipped`].
pub fn load_history(path: &Path) -> Result<NormalizedHistory, TimelineError> {
    let file = File::open(path)?;
    let records: Vec<Value> = serde_json::from_reader(BufReader::new(file))?;
    info!(path = %path.display(), records = records.len(), "Read location history");
    Ok(normalize_history(&records))
}

/// Converts every record into location samples and sorts them by UTC timestamp.
///
/// A record that fails to convert is logged, recorded in `skipped` and left out;
/// it never aborts the rest of the document.
pub fn normalize_history(records: &[Value]) -> NormalizedHistory {
    let mut samples = Vec::new();
    let mut skipped = Vec::new();
    let mut unrecognized = 0;

    for (index, value) in records.iter().enumerate() {
        match samples_from_value(value) {
            Ok(Some(record_samples)) => samples.extend(record_samples),
            Ok(None) => unrecognized += 1,
            Err(error) => {
                warn!(index, %error, "Skipping location history record");
                skipped.push(SkippedRecord {
                    index,
                    reason: error.to_string(),
                });
            }
        }
    }

    let timeline = Timeline::from_samples(samples);
    info!(
        samples = timeline.len(),
        skipped = skipped.len(),
        unrecognized,
        "Built location timeline"
    );
    if let Some((first, last)) = timeline.span() {
        debug!(%first, %last, "Timeline span");
    }

    NormalizedHistory {
        timeline,
        skipped,
        unrecognized,
    }
}

fn samples_from_value(value: &Value) -> Result<Option<Vec<LocationSample>>, TimelineError> {
    let raw = RawHistoryRecord::deserialize(value)
        .map_err(|e| TimelineError::InvalidRecord(e.to_string()))?;
    raw.into_record()?.map(record_samples).transpose()
}

fn record_samples(record: HistoryRecord) -> Result<Vec<LocationSample>, TimelineError> {
    match record {
        HistoryRecord::TimelinePath { start_time, points } => path_samples(&start_time, &points),
        HistoryRecord::Activity {
            start_time,
            end_time,
            start,
            end,
        } => {
            let (start_lat, start_lng) = parse_geo_point(&start)?;
            let (end_lat, end_lng) = parse_geo_point(&end)?;
            Ok(vec![
                LocationSample::new(
                    local_to_utc(&start_time)?,
                    start_lat,
                    start_lng,
                    Some(SourceKind::ActivityStart),
                ),
                LocationSample::new(
                    local_to_utc(&end_time)?,
                    end_lat,
                    end_lng,
                    Some(SourceKind::ActivityEnd),
                ),
            ])
        }
        HistoryRecord::Visit {
            start_time,
            end_time,
            place_location,
        } => {
            let (lat, lng) = parse_geo_point(&place_location)?;
            Ok(vec![
                LocationSample::new(
                    local_to_utc(&start_time)?,
                    lat,
                    lng,
                    Some(SourceKind::VisitStart),
                ),
                LocationSample::new(local_to_utc(&end_time)?, lat, lng, Some(SourceKind::VisitEnd)),
            ])
        }
    }
}

/// Path points are offsets in minutes from a start time that is already UTC.
fn path_samples(
    start_time: &str,
    points: &[RawPathPoint],
) -> Result<Vec<LocationSample>, TimelineError> {
    let start = parse_history_timestamp(start_time)?.naive_local();

    points
        .iter()
        .map(|point| {
            let minutes = point.duration_minutes_offset_from_start_time;
            let timestamp = TimeDelta::try_minutes(minutes)
                .and_then(|offset| start.checked_add_signed(offset))
                .ok_or_else(|| {
                    TimelineError::InvalidRecord(format!(
                        "path point offset of {minutes} minutes is out of range"
                    ))
                })?;
            let (lat, lng) = parse_geo_point(&point.point)?;
            Ok(LocationSample::new(
                timestamp.trunc_subsecs(0),
                lat,
                lng,
                Some(SourceKind::Timeline),
            ))
        })
        .collect()
}

/// Activity and visit timestamps are local; each carries its own offset.
fn local_to_utc(timestamp: &str) -> Result<NaiveDateTime, TimelineError> {
    let local = parse_history_timestamp(timestamp)?;
    Ok(to_naive_utc(&local)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::error::TimeError;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::path::PathBuf;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn asset_path(relative: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("assets")
            .join(relative)
    }

    fn visit(start: &str, end: &str, place: &str) -> Value {
        json!({
            "startTime": start,
            "endTime": end,
            "visit": { "hierarchyLevel": "0", "topCandidate": { "placeLocation": place } }
        })
    }

    fn activity(start: &str, end: &str, from: &str, to: &str) -> Value {
        json!({
            "startTime": start,
            "endTime": end,
            "activity": { "start": from, "end": to, "distanceMeters": "1234.5" }
        })
    }

    fn mixed_document() -> Vec<Value> {
        vec![
            activity(
                "2024-01-01T12:00:00.000+01:00",
                "2024-01-01T12:30:00.000+01:00",
                "geo:52.0907,5.1214",
                "geo:52.3676,4.9041",
            ),
            json!({
                "startTime": "2024-01-01T09:00:00.000+00:00",
                "endTime": "2024-01-01T11:00:00.000+00:00",
                "timelinePath": [
                    { "point": "geo:52.0,4.0", "durationMinutesOffsetFromStartTime": "90" },
                    { "point": "geo:52.1,4.1", "durationMinutesOffsetFromStartTime": "0" }
                ]
            }),
            visit(
                "2024-01-01T08:00:00.000+01:00",
                "2024-01-01T09:15:00.000+01:00",
                "geo:52.3676,4.9041",
            ),
        ]
    }

    #[test]
    fn test_activity_converts_both_endpoints_to_utc() {
        let history = normalize_history(&[activity(
            "2024-01-01T09:00:00.000+02:00",
            "2024-01-01T10:00:00.000+02:00",
            "geo:52.0907,5.1214",
            "geo:52.3676,4.9041",
        )]);

        let samples = history.timeline.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp_utc, utc(2024, 1, 1, 7, 0, 0));
        assert_eq!(samples[0].source_kind, Some(SourceKind::ActivityStart));
        assert_eq!((samples[0].latitude, samples[0].longitude), (52.0907, 5.1214));
        assert_eq!(samples[1].timestamp_utc, utc(2024, 1, 1, 8, 0, 0));
        assert_eq!(samples[1].source_kind, Some(SourceKind::ActivityEnd));
        assert_eq!((samples[1].latitude, samples[1].longitude), (52.3676, 4.9041));
    }

    #[test]
    fn test_activity_endpoints_use_their_own_offsets() {
        // Crosses the start of CEST: the start is +01:00, the end +02:00.
        let history = normalize_history(&[activity(
            "2024-03-31T01:30:00.000+01:00",
            "2024-03-31T03:30:00.000+02:00",
            "geo:1,1",
            "geo:2,2",
        )]);

        let times: Vec<_> = history.timeline.iter().map(|s| s.timestamp_utc).collect();
        assert_eq!(times, vec![utc(2024, 3, 31, 0, 30, 0), utc(2024, 3, 31, 1, 30, 0)]);
    }

    #[test]
    fn test_visit_shares_one_coordinate() {
        let history = normalize_history(&[visit(
            "2024-06-01T18:00:00.000-04:00",
            "2024-06-01T20:45:10.999-04:00",
            "geo:40.7128,-74.006",
        )]);

        let samples = history.timeline.samples();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].timestamp_utc, utc(2024, 6, 1, 22, 0, 0));
        assert_eq!(samples[0].source_kind, Some(SourceKind::VisitStart));
        // Sub-seconds are truncated, not rounded.
        assert_eq!(samples[1].timestamp_utc, utc(2024, 6, 2, 0, 45, 10));
        assert_eq!(samples[1].source_kind, Some(SourceKind::VisitEnd));
        for sample in samples {
            assert_eq!((sample.latitude, sample.longitude), (40.7128, -74.006));
        }
    }

    #[test]
    fn test_timeline_path_offsets_from_start_time() {
        let history = normalize_history(&[json!({
            "startTime": "2024-01-01T06:00:00.750+00:00",
            "endTime": "2024-01-01T08:00:00.000+00:00",
            "timelinePath": [
                { "point": "geo:52.370216,4.895168", "durationMinutesOffsetFromStartTime": "0" },
                { "point": "geo:52.372,4.9", "durationMinutesOffsetFromStartTime": 30 },
                { "point": "geo:52.375,4.91", "durationMinutesOffsetFromStartTime": "95" }
            ]
        })]);

        let samples = history.timeline.samples();
        let times: Vec<_> = samples.iter().map(|s| s.timestamp_utc).collect();
        assert_eq!(
            times,
            vec![
                utc(2024, 1, 1, 6, 0, 0),
                utc(2024, 1, 1, 6, 30, 0),
                utc(2024, 1, 1, 7, 35, 0)
            ]
        );
        assert!(samples.iter().all(|s| s.source_kind == Some(SourceKind::Timeline)));
    }

    #[test]
    fn test_timeline_path_start_time_is_taken_as_utc() {
        // Path start times are already UTC: the wall clock is kept and the
        // embedded offset is discarded rather than applied.
        let history = normalize_history(&[json!({
            "startTime": "2024-01-01T06:00:00.000+01:00",
            "timelinePath": [
                { "point": "geo:52.0,4.0", "durationMinutesOffsetFromStartTime": "10" }
            ]
        })]);
        assert_eq!(
            history.timeline.samples()[0].timestamp_utc,
            utc(2024, 1, 1, 6, 10, 0)
        );
    }

    #[test]
    fn test_compact_offsets_in_timestamps() {
        let history = normalize_history(&[visit(
            "2024-01-01T09:00:00.000+0200",
            "2024-01-01T09:30:00.000+0200",
            "geo:1,1",
        )]);
        assert_eq!(
            history.timeline.first().unwrap().timestamp_utc,
            utc(2024, 1, 1, 7, 0, 0)
        );
    }

    #[test]
    fn test_output_is_sorted_across_records() {
        let history = normalize_history(&mixed_document());
        let samples = history.timeline.samples();

        assert_eq!(samples.len(), 6);
        assert!(samples.windows(2).all(|w| w[0].timestamp_utc <= w[1].timestamp_utc));
        let kinds: Vec<_> = samples.iter().filter_map(|s| s.source_kind).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::VisitStart,
                SourceKind::VisitEnd,
                SourceKind::Timeline,
                SourceKind::Timeline,
                SourceKind::ActivityStart,
                SourceKind::ActivityEnd,
            ]
        );
    }

    #[test]
    fn test_equal_timestamps_keep_document_order() {
        // The visit ends at 08:00 UTC and the activity starts at 08:00 UTC.
        let history = normalize_history(&[
            visit("2024-01-01T08:30:00.000+01:00", "2024-01-01T09:00:00.000+01:00", "geo:1,1"),
            activity("2024-01-01T10:00:00.000+02:00", "2024-01-01T11:00:00.000+02:00", "geo:2,2", "geo:3,3"),
        ]);
        let kinds: Vec<_> = history.timeline.iter().filter_map(|s| s.source_kind).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::VisitStart,
                SourceKind::VisitEnd,
                SourceKind::ActivityStart,
                SourceKind::ActivityEnd,
            ]
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let document = mixed_document();
        let first = normalize_history(&document);
        let second = normalize_history(&document);
        assert_eq!(first.timeline, second.timeline);
    }

    #[test]
    fn test_malformed_geo_point_drops_only_that_record() {
        let history = normalize_history(&[
            visit("2024-01-01T09:00:00.000+02:00", "2024-01-01T10:00:00.000+02:00", "geo:52.0,4.0"),
            activity(
                "2024-01-01T11:00:00.000+02:00",
                "2024-01-01T12:00:00.000+02:00",
                "geo:abc,123",
                "geo:52.1,4.1",
            ),
            visit("2024-01-01T13:00:00.000+02:00", "2024-01-01T14:00:00.000+02:00", "geo:52.2,4.2"),
        ]);

        assert_eq!(history.timeline.len(), 4);
        assert!(history.timeline.iter().all(|s| s.latitude != 52.1));
        assert_eq!(history.skipped.len(), 1);
        assert_eq!(history.skipped[0].index, 1);
        assert!(history.skipped[0].reason.contains("geo:abc,123"));
        assert_eq!(history.unrecognized, 0);
    }

    #[test]
    fn test_bad_timestamp_drops_record() {
        let history = normalize_history(&[visit("last tuesday", "2024-01-01T10:00:00.000+02:00", "geo:1,1")]);
        assert!(history.timeline.is_empty());
        assert_eq!(history.skipped.len(), 1);
        assert_eq!(
            history.skipped[0].reason,
            TimelineError::Time(TimeError::InvalidTimestamp("last tuesday".to_string())).to_string()
        );
    }

    #[test]
    fn test_structural_problems_drop_record() {
        let history = normalize_history(&[
            // activity without endTime
            json!({
                "startTime": "2024-01-01T09:00:00.000+02:00",
                "activity": { "start": "geo:1,1", "end": "geo:2,2" }
            }),
            // visit without a place
            json!({
                "startTime": "2024-01-01T09:00:00.000+02:00",
                "endTime": "2024-01-01T10:00:00.000+02:00",
                "visit": { "topCandidate": {} }
            }),
            // not even an object
            json!(42),
        ]);
        assert!(history.timeline.is_empty());
        let indices: Vec<_> = history.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_unrecognized_records_are_dropped_silently() {
        let history = normalize_history(&[
            json!({
                "startTime": "2024-01-01T09:00:00.000+02:00",
                "endTime": "2024-01-01T10:00:00.000+02:00",
                "timelineMemory": { "destinations": [] }
            }),
            visit("2024-01-01T09:00:00.000+02:00", "2024-01-01T10:00:00.000+02:00", "geo:1,1"),
        ]);
        assert_eq!(history.timeline.len(), 2);
        assert!(history.skipped.is_empty());
        assert_eq!(history.unrecognized, 1);
    }

    #[test]
    fn test_load_history_from_file() {
        let history = load_history(&asset_path("location-history.json")).unwrap();

        let times: Vec<_> = history.timeline.iter().map(|s| s.timestamp_utc).collect();
        assert_eq!(
            times,
            vec![
                utc(2024, 1, 1, 6, 0, 0),
                utc(2024, 1, 1, 6, 30, 0),
                utc(2024, 1, 1, 7, 0, 0),
                utc(2024, 1, 1, 8, 0, 0),
                utc(2024, 1, 1, 9, 15, 0),
                utc(2024, 1, 1, 10, 45, 30),
            ]
        );
        let skipped: Vec<_> = history.skipped.iter().map(|s| s.index).collect();
        assert_eq!(skipped, vec![3, 5]);
        assert_eq!(history.unrecognized, 1);
    }

    #[test]
    fn test_load_history_missing_file() {
        let result = load_history(&asset_path("does-not-exist.json"));
        assert!(matches!(result, Err(TimelineError::Io(_))));
    }

    #[test]
    fn test_load_history_rejects_non_array_document() {
        let result = load_history(&asset_path("not-a-history.json"));
        assert!(matches!(result, Err(TimelineError::Json(_))));
    }
}
