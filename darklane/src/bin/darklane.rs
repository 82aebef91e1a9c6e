//! Dark-lane detection front end
//!
//! Runs the dark-lane pipeline on one or more images and writes, per image,
//! `improved_dark_detection.json` plus a viewable mask PNG.
//!
//! # Usage
//!
//! ```bash
//! # Single image, outputs straight into ./out
//! darklane --image milky_way.jpg --out out
//!
//! # Custom mask location and a tuned configuration
//! darklane --image milky_way.jpg --out out --mask-png lanes.png --config tuned.json
//!
//! # Several images in parallel, one sub-directory per image stem
//! RUST_LOG=info darklane --image a.jpg --image b.jpg --out out
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use darklane::io::{detect_dark_lanes_from_file, save_mask_png, MASK_FILE_NAME};
use darklane::{DarkLaneConfig, DarkLaneDetector};
use log::{error, warn};
use rayon::prelude::*;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Detect dark lanes and measure their morphology",
    long_about = None
)]
struct Cli {
    /// Input image(s); repeat the flag for batch runs
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Output directory (created if missing)
    #[arg(long)]
    out: PathBuf,

    /// Mask PNG path (default: <out>/dark_lane_mask.png); single image only
    #[arg(long)]
    mask_png: Option<PathBuf>,

    /// JSON file with a DarkLaneConfig; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Output directory for one image of the batch.
fn output_dir(out: &Path, image: &Path, batch: bool) -> PathBuf {
    if !batch {
        return out.to_path_buf();
    }
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    out.join(stem)
}

fn process(
    image: &Path,
    out_dir: &Path,
    mask_png: Option<&Path>,
    detector: &DarkLaneDetector,
) -> darklane::Result<()> {
    let result = detect_dark_lanes_from_file(image, Some(out_dir), detector)?;

    let mask_path = mask_png
        .map(Path::to_path_buf)
        .unwrap_or_else(|| out_dir.join(MASK_FILE_NAME));
    if let Err(e) = save_mask_png(result.combined_mask.view(), &mask_path) {
        warn!("could not write mask {}: {e}", mask_path.display());
    }

    println!(
        "{}: {:.2}% dark, {} components, {} seeds -> {}",
        image.display(),
        100.0 * result.metrics.dark_area_fraction,
        result.metrics.num_dark_components,
        result.metrics.watershed_seeds,
        out_dir.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let batch = cli.images.len() > 1;
    if batch && cli.mask_png.is_some() {
        error!("--mask-png can only be used with a single --image");
        return ExitCode::FAILURE;
    }

    let config = match &cli.config {
        Some(path) => match DarkLaneConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("failed to load config {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => DarkLaneConfig::default(),
    };

    let detector = match DarkLaneDetector::new(config) {
        Ok(detector) => detector,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let failures = cli
        .images
        .par_iter()
        .filter(|image| {
            let dir = output_dir(&cli.out, image, batch);
            match process(image, &dir, cli.mask_png.as_deref(), &detector) {
                Ok(()) => false,
                Err(e) => {
                    error!("{}: {e}", image.display());
                    true
                }
            }
        })
        .count();

    if failures > 0 {
        eprintln!("{failures} of {} image(s) failed", cli.images.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
