use crate::GeotagError;
use crate::gps::DmsCoordinate;
use crate::timeline::structs::LocationSample;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A photo matched to a location sample, with the encoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsMatch {
    /// The photo's capture time in UTC, used as lookup key.
    pub photo_time_utc: NaiveDateTime,
    pub sample: LocationSample,
    /// Absolute time between the photo and the sample.
    pub gap_seconds: i64,
    pub latitude: DmsCoordinate,
    pub longitude: DmsCoordinate,
}

/// What happened to a single photo that was processed without error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum PhotoOutcome {
    /// GPS tags were written.
    Tagged(GpsMatch),
    /// A match was found but nothing was written.
    DryRun(GpsMatch),
    /// The photo already has GPS tags.
    SkippedGpsPresent,
    /// The nearest sample is at least the tolerance away from the photo.
    SkippedOutsideTolerance {
        photo_time_utc: NaiveDateTime,
        nearest: LocationSample,
        gap_seconds: i64,
    },
}

/// Outcome of one photo in a batch.
#[derive(Debug)]
pub struct PhotoReport {
    pub path: PathBuf,
    pub result: Result<PhotoOutcome, GeotagError>,
}

impl PhotoReport {
    /// Creates the report and logs it, identifying the photo and the reason for any skip.
    pub fn new(path: PathBuf, result: Result<PhotoOutcome, GeotagError>) -> Self {
        let photo = path.display();
        match &result {
            Ok(PhotoOutcome::Tagged(m)) => info!(
                %photo,
                location = %m.sample,
                gap_seconds = m.gap_seconds,
                "GPS data updated"
            ),
            Ok(PhotoOutcome::DryRun(m)) => info!(
                %photo,
                location = %m.sample,
                gap_seconds = m.gap_seconds,
                "Dry run, GPS data not written"
            ),
            Ok(PhotoOutcome::SkippedGpsPresent) => {
                info!(%photo, "Skipping, GPS data already present");
            }
            Ok(PhotoOutcome::SkippedOutsideTolerance {
                nearest,
                gap_seconds,
                ..
            }) => warn!(
                %photo,
                nearest = %nearest,
                gap_seconds,
                "Skipping, no location data within tolerance"
            ),
            Err(error) => warn!(%photo, %error, "Skipping photo"),
        }
        debug!(%photo, ok = result.is_ok(), "Photo processed");
        Self { path, result }
    }
}

/// A photo that was processed without error, with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPhoto {
    pub path: PathBuf,
    pub outcome: PhotoOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedPhoto {
    pub path: PathBuf,
    pub reason: String,
}

/// Per-status counts over a batch of [`PhotoReport`]s, plus every photo's outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub tagged: usize,
    pub dry_run: usize,
    pub skipped_gps_present: usize,
    pub skipped_outside_tolerance: usize,
    pub failed: usize,
    /// Matches and skips in input order, including the coordinates of dry-run matches.
    pub processed: Vec<ProcessedPhoto>,
    pub failures: Vec<FailedPhoto>,
}

impl BatchSummary {
    pub fn from_reports(reports: &[PhotoReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Self::default()
        };
        for report in reports {
            match &report.result {
                Ok(outcome) => {
                    match outcome {
                        PhotoOutcome::Tagged(_) => summary.tagged += 1,
                        PhotoOutcome::DryRun(_) => summary.dry_run += 1,
                        PhotoOutcome::SkippedGpsPresent => summary.skipped_gps_present += 1,
                        PhotoOutcome::SkippedOutsideTolerance { .. } => {
                            summary.skipped_outside_tolerance += 1;
                        }
                    }
                    summary.processed.push(ProcessedPhoto {
                        path: report.path.clone(),
                        outcome: outcome.clone(),
                    });
                }
                Err(error) => {
                    summary.failed += 1;
                    summary.failures.push(FailedPhoto {
                        path: report.path.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }
        summary
    }
}
