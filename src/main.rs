use chrono::TimeDelta;
use clap::{Parser, ValueEnum, ValueHint};
use color_eyre::eyre::eyre;
use std::io;
use std::path::PathBuf;
use timeline_geotag::{
    BatchSummary, Geotagger, RoundingMode, TieBreak, list_photos, load_history,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Write GPS coordinates from a Google Maps Timeline export into photos",
    long_about = None
)]
struct Cli {
    /// Location history JSON exported from Google Maps Timeline.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    json: PathBuf,

    /// Folder with the photos to geotag.
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    dir: PathBuf,

    /// Maximum time difference in hours between a photo and a location point.
    #[arg(short, long, default_value_t = 1)]
    time: u32,

    /// Path to the exiftool executable; searched in PATH when omitted.
    #[arg(long, value_hint = ValueHint::FilePath)]
    exiftool: Option<PathBuf>,

    /// Also geotag photos in subfolders.
    #[arg(long)]
    recursive: bool,

    /// Include hidden files and folders.
    #[arg(long)]
    include_hidden: bool,

    /// Replace GPS data that is already present.
    #[arg(long)]
    overwrite: bool,

    /// Report matches without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Which location point wins when a photo is exactly between two.
    #[arg(long, value_enum, default_value_t = TieBreakOpt::Later)]
    tie_break: TieBreakOpt,

    /// Rounding of GPS seconds on exact halves.
    #[arg(long, value_enum, default_value_t = RoundingOpt::HalfEven)]
    rounding: RoundingOpt,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TieBreakOpt {
    Later,
    Earlier,
}

impl From<TieBreakOpt> for TieBreak {
    fn from(opt: TieBreakOpt) -> Self {
        match opt {
            TieBreakOpt::Later => Self::Later,
            TieBreakOpt::Earlier => Self::Earlier,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RoundingOpt {
    HalfEven,
    HalfAwayFromZero,
}

impl From<RoundingOpt> for RoundingMode {
    fn from(opt: RoundingOpt) -> Self {
        match opt {
            RoundingOpt::HalfEven => Self::HalfEven,
            RoundingOpt::HalfAwayFromZero => Self::HalfAwayFromZero,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let geotagger = Geotagger::builder()
        .maybe_exiftool_path(cli.exiftool)
        .tolerance(TimeDelta::hours(i64::from(cli.time)))
        .tie_break(cli.tie_break.into())
        .rounding(cli.rounding.into())
        .overwrite_existing(cli.overwrite)
        .dry_run(cli.dry_run)
        .build();

    geotagger.check_exiftool()?;

    let history = load_history(&cli.json)?;
    if history.timeline.is_empty() {
        return Err(eyre!(
            "no usable location data in {}",
            cli.json.display()
        ));
    }

    let photos = list_photos(&cli.dir, cli.recursive, cli.include_hidden)?;
    info!(
        dir = %cli.dir.display(),
        photos = photos.len(),
        tolerance_minutes = geotagger.tolerance().num_minutes(),
        dry_run = cli.dry_run,
        "Found photos"
    );

    let reports = geotagger.geotag_photos(&history.timeline, &photos)?;
    let summary = BatchSummary::from_reports(&reports);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
