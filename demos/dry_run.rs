use std::path::Path;
use timeline_geotag::{BatchSummary, Geotagger, list_photos, load_history};

/// Matches the photos in `photos/` against `location-history.json` without writing anything.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().init();

    let geotagger = Geotagger::builder().dry_run(true).build();
    geotagger.check_exiftool()?;

    let history = load_history(Path::new("location-history.json"))?;
    let photos = list_photos(Path::new("photos"), true, false)?;
    let reports = geotagger.geotag_photos(&history.timeline, &photos)?;

    let summary = BatchSummary::from_reports(&reports);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
