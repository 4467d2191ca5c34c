//! Sandbox configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `particulate.ron` file (if exists), or an explicit path
//! 3. Environment variables prefixed with `PARTICULATE_`
//!
//! Example environment variable: `PARTICULATE_WORLD__WIDTH=320`
//!
//! The browser build has no filesystem or environment and always uses the
//! compiled defaults.

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParticulateConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub brush: BrushConfig,

    #[serde(default)]
    pub headless: HeadlessConfig,
}

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: particulate_simulation::DEFAULT_WIDTH,
            height: particulate_simulation::DEFAULT_HEIGHT,
        }
    }
}

/// Frame buffer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Side of the square block each cell is drawn as, in pixels
    pub cell_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { cell_size: 4 }
    }
}

/// Brush settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushConfig {
    /// Brush used when the page does not provide one
    pub default_size: u32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self { default_size: 4 }
    }
}

/// Headless pour settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessConfig {
    /// Frames to simulate
    pub frames: usize,
    /// Seed for the pour jitter
    pub seed: u64,
    /// Log progress every this many frames (0 disables)
    pub log_interval: usize,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            seed: 42,
            log_interval: 100,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ParticulateConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `particulate.ron` in the working directory, or `path` when given
    /// 3. Environment variables prefixed with `PARTICULATE_` (highest priority)
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        Self::load_with_env(path, Self::environment())
    }

    /// `PARTICULATE_WORLD__WIDTH=320` sets `world.width`
    fn environment() -> config::Environment {
        config::Environment::with_prefix("PARTICULATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(
        path: Option<&std::path::Path>,
        environment: config::Environment,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;
        use config::{Config, File, FileFormat};

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("particulate")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.width", particulate_simulation::DEFAULT_WIDTH as i64)?
            .set_default("world.height", particulate_simulation::DEFAULT_HEIGHT as i64)?
            .set_default("render.cell_size", 4_i64)?
            .set_default("brush.default_size", 4_i64)?
            .set_default("headless.frames", 600_i64)?
            .set_default("headless.seed", 42_i64)?
            .set_default("headless.log_interval", 100_i64)?
            // Layer 2: Config file
            .add_source(file)
            // Layer 3: Environment variables (PARTICULATE_WORLD__WIDTH, etc.)
            .add_source(environment);

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
