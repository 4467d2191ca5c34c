//! # Particulate - Falling Sand
//!
//! A cellular-automaton sand toy drawn on an HTML5 canvas. The same
//! sandbox also runs natively for headless pours.

pub mod config;
pub mod input;
pub mod render;
pub mod sandbox;

// Headless runner (native only)
#[cfg(not(target_arch = "wasm32"))]
pub mod headless;

// Browser entry point
#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-export the simulation crate for convenience
pub use particulate_simulation as simulation;

pub use config::ParticulateConfig;
pub use sandbox::Sandbox;

/// Common imports for internal use
pub mod prelude {
    pub use crate::input::{CanvasGeometry, tool_for_buttons};
    pub use crate::render::{FrameBuffer, Palette};
    pub use particulate_simulation::{Cell, Tool, World};
}
