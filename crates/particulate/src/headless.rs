//! Headless pour runner
//!
//! Pours sand into a sandbox without a browser, logs progress and saves the
//! final frame as a PNG. Useful for checking the simulation visually from CI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use particulate_simulation::Tool;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::ParticulateConfig;
use crate::render::FrameBuffer;
use crate::sandbox::Sandbox;

/// Options for a single headless run
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    /// Frames to simulate
    pub frames: usize,
    /// Seed for the pour jitter
    pub seed: u64,
    /// Brush size of the pour
    pub brush: u32,
    /// Where to write the final frame (None = don't save)
    pub output: Option<PathBuf>,
}

impl HeadlessOptions {
    /// Options taken from the `headless` and `brush` config sections
    pub fn from_config(config: &ParticulateConfig) -> Self {
        Self {
            frames: config.headless.frames,
            seed: config.headless.seed,
            brush: config.brush.default_size,
            output: None,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessReport {
    pub frames: usize,
    pub grains: usize,
    pub cells_moved: u64,
}

/// Run a pour and optionally save the last frame
pub fn run_headless(config: &ParticulateConfig, options: &HeadlessOptions) -> Result<HeadlessReport> {
    let mut sandbox = Sandbox::new(config)?;
    let mut rng = Xoshiro256StarStar::seed_from_u64(options.seed);

    let width = sandbox.world().width() as i32;
    let spout_x = width / 2;
    let spout_y = options.brush as i32;
    let jitter = (width / 8).max(1);

    log::info!(
        "Pouring for {} frames (seed {}, brush {})",
        options.frames,
        options.seed,
        options.brush
    );

    // The spout stays open for the first half, then the pile settles
    let pour_frames = options.frames / 2;
    for frame in 0..options.frames {
        if frame < pour_frames {
            let x = spout_x + rng.gen_range(-jitter..=jitter);
            sandbox.pointer_down((x, spout_y), options.brush, Tool::Sand);
            sandbox.pointer_up();
        }

        let moved = sandbox.tick();

        let interval = config.headless.log_interval;
        if interval > 0 && (frame + 1) % interval == 0 {
            log::info!(
                "Frame {}: {} grains, {} moved",
                frame + 1,
                sandbox.grain_count(),
                moved
            );
        }
    }

    let report = HeadlessReport {
        frames: options.frames,
        grains: sandbox.grain_count(),
        cells_moved: sandbox.cells_moved(),
    };

    if let Some(path) = &options.output {
        save_frame_as_png(sandbox.frame(), path)?;
        log::info!("Saved frame to {}", path.display());
    }

    Ok(report)
}

/// Save RGBA frame as PNG
pub fn save_frame_as_png(frame: &FrameBuffer, path: impl AsRef<Path>) -> Result<()> {
    use image::{ImageBuffer, Rgba};

    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let img: ImageBuffer<Rgba<u8>, _> = ImageBuffer::from_raw(
        frame.width() as u32,
        frame.height() as u32,
        frame.pixels().to_vec(),
    )
    .ok_or_else(|| anyhow::anyhow!("Failed to create image buffer"))?;

    img.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
