use std::path::PathBuf;

use clap::Parser;
use particulate::ParticulateConfig;
use particulate::headless::{HeadlessOptions, run_headless};

#[derive(Parser, Debug)]
#[command(author, version, about = "Pour falling sand headlessly and save the result", long_about = None)]
struct Args {
    /// Configuration file (RON); defaults to ./particulate.ron when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(long)]
    frames: Option<usize>,

    /// Seed for the pour jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Brush size of the pour
    #[arg(long)]
    brush: Option<u32>,

    /// Output path for the final frame
    #[arg(long, default_value = "screenshots/particulate.png")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ParticulateConfig::load(args.config.as_deref())?;

    let mut options = HeadlessOptions::from_config(&config);
    if let Some(frames) = args.frames {
        options.frames = frames;
    }
    if let Some(seed) = args.seed {
        options.seed = seed;
    }
    if let Some(brush) = args.brush {
        options.brush = brush;
    }
    options.output = Some(args.output);

    log::info!("Starting Particulate (headless)");
    let report = run_headless(&config, &options)?;
    log::info!(
        "Done: {} frames, {} grains, {} cells moved",
        report.frames,
        report.grains,
        report.cells_moved
    );

    Ok(())
}
