use crate::GeotagError;
use crate::gps::{LATITUDE_REFS, LONGITUDE_REFS, RoundingMode, to_dms};
use crate::metadata::error::MetadataError;
use crate::metadata::{ExifToolService, MetadataService};
use crate::structs::{GpsMatch, PhotoOutcome, PhotoReport};
use crate::timeline::error::TimelineError;
use crate::timeline::{TieBreak, Timeline};
use bon::bon;
use chrono::TimeDelta;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Matches photos against a location timeline and writes the result into their metadata.
///
/// The geotagger only holds configuration; the [`Timeline`] is passed in so it can be
/// built once and shared by every worker.
///
/// ```rust,no_run
/// # use std::path::Path;
/// # use timeline_geotag::{Geotagger, GeotagError, load_history, list_photos};
/// # fn main() -> Result<(), GeotagError> {
/// let geotagger = Geotagger::builder()
///     .tolerance(chrono::TimeDelta::hours(2))
///     .build();
/// geotagger.check_exiftool()?;
///
/// let history = load_history(Path::new("location-history.json"))?;
/// let photos = list_photos(Path::new("photos"), false, false)?;
/// let reports = geotagger.geotag_photos(&history.timeline, &photos)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Geotagger {
    exiftool_path: Option<PathBuf>,
    tolerance: TimeDelta,
    tie_break: TieBreak,
    rounding: RoundingMode,
    overwrite_existing: bool,
    dry_run: bool,
}

#[bon]
impl Geotagger {
    /// Constructs a `Geotagger` via a builder pattern.
    ///
    /// # Builder Arguments
    ///
    /// * `exiftool_path: Option<PathBuf>` - An optional path to a specific `exiftool` executable. If `None`, `exiftool` is searched for in the system's PATH.
    /// * `tolerance: TimeDelta` - (Default: 1 hour) Photos whose nearest location sample is this far away or farther are skipped.
    /// * `tie_break: TieBreak` - (Default: `Later`) Which sample wins when a photo sits exactly between two.
    /// * `rounding: RoundingMode` - (Default: `HalfEven`) How GPS seconds are rounded to five decimals.
    /// * `overwrite_existing: bool` - (Default: `false`) Also tag photos that already have GPS data.
    /// * `dry_run: bool` - (Default: `false`) Match and report, but never write.
    #[builder]
    pub fn new(
        exiftool_path: Option<PathBuf>,
        #[builder(default = TimeDelta::hours(1))] tolerance: TimeDelta,
        #[builder(default)] tie_break: TieBreak,
        #[builder(default)] rounding: RoundingMode,
        #[builder(default)] overwrite_existing: bool,
        #[builder(default)] dry_run: bool,
    ) -> Self {
        Self {
            exiftool_path,
            tolerance,
            tie_break,
            rounding,
            overwrite_existing,
            dry_run,
        }
    }

    pub fn tolerance(&self) -> TimeDelta {
        self.tolerance
    }

    /// Verifies that `exiftool` can be started and returns its version.
    ///
    /// Meant as a startup precondition, before any history is loaded.
    pub fn check_exiftool(&self) -> Result<String, GeotagError> {
        let mut service = ExifToolService::new(self.exiftool_path.as_deref())?;
        let version = service.version()?;
        info!(%version, "Found exiftool");
        Ok(version)
    }

    /// Geotags a single photo through `service`.
    ///
    /// # Errors
    ///
    /// * [`GeotagError::Metadata`]: the capture time could not be read, or the write failed.
    /// * [`GeotagError::Time`]: the photo's UTC offset is malformed.
    /// * [`GeotagError::Timeline`]: the timeline is empty.
    pub fn geotag_photo<S: MetadataService>(
        &self,
        service: &mut S,
        timeline: &Timeline,
        photo: &Path,
    ) -> Result<PhotoOutcome, GeotagError> {
        let capture = service.read_capture(photo)?;
        if capture.has_gps && !self.overwrite_existing {
            return Ok(PhotoOutcome::SkippedGpsPresent);
        }

        let photo_time_utc = capture.utc_timestamp()?;
        let sample = timeline.nearest_with(photo_time_utc, self.tie_break)?;
        let gap = sample.time_distance(photo_time_utc);
        if gap >= self.tolerance {
            return Ok(PhotoOutcome::SkippedOutsideTolerance {
                photo_time_utc,
                nearest: sample.clone(),
                gap_seconds: gap.num_seconds(),
            });
        }

        let gps_match = GpsMatch {
            photo_time_utc,
            sample: sample.clone(),
            gap_seconds: gap.num_seconds(),
            latitude: to_dms(sample.latitude, LATITUDE_REFS, self.rounding),
            longitude: to_dms(sample.longitude, LONGITUDE_REFS, self.rounding),
        };
        if self.dry_run {
            return Ok(PhotoOutcome::DryRun(gps_match));
        }

        service.write_gps(photo, &gps_match.latitude, &gps_match.longitude)?;
        Ok(PhotoOutcome::Tagged(gps_match))
    }

    /// Geotags `photos` in parallel, one `exiftool` process per worker thread.
    ///
    /// Photos are split into one contiguous chunk per rayon thread; reports keep
    /// the order of `photos`.
    ///
    /// # Errors
    ///
    /// Only [`TimelineError::EmptyTimeline`]; every per-photo failure is reported in
    /// the returned [`PhotoReport`]s instead.
    pub fn geotag_photos(
        &self,
        timeline: &Timeline,
        photos: &[PathBuf],
    ) -> Result<Vec<PhotoReport>, GeotagError> {
        let exiftool_path = self.exiftool_path.as_deref();
        self.geotag_photos_with(timeline, photos, || ExifToolService::new(exiftool_path))
    }

    /// Like [`Geotagger::geotag_photos`], with a custom service per worker thread.
    ///
    /// `make_service` is called once per chunk, never more than
    /// [`rayon::current_num_threads`] times per batch.
    pub fn geotag_photos_with<S, F>(
        &self,
        timeline: &Timeline,
        photos: &[PathBuf],
        make_service: F,
    ) -> Result<Vec<PhotoReport>, GeotagError>
    where
        S: MetadataService,
        F: Fn() -> Result<S, MetadataError> + Sync + Send,
    {
        if timeline.is_empty() {
            return Err(TimelineError::EmptyTimeline.into());
        }
        info!(photos = photos.len(), samples = timeline.len(), "Geotagging photos");

        // At most one contiguous chunk per thread, and one service per chunk.
        let chunk_len = photos.len().div_ceil(rayon::current_num_threads()).max(1);
        let reports = photos
            .par_chunks(chunk_len)
            .map(|chunk| {
                let mut service = make_service();
                chunk
                    .iter()
                    .map(|photo| {
                        let result = match &mut service {
                            Ok(service) => self.geotag_photo(service, timeline, photo),
                            Err(error) => Err(GeotagError::ServiceUnavailable(error.to_string())),
                        };
                        PhotoReport::new(photo.clone(), result)
                    })
                    .collect::<Vec<_>>()
            })
            .flatten_iter()
            .collect();
        Ok(reports)
    }
}
