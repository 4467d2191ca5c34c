//! Falling sand simulation for Particulate
//!
//! This crate provides the pure simulation types:
//! - Cell and tool types (Cell, Tool)
//! - The world grid and its update rule (World, World::step)
//! - Circular brush painting (World::paint)
//! - Statistics hooks (SimStats, NoopStats, CountingStats)

mod brush;
mod cell;
mod error;
mod stats;
mod update;
mod world;

pub use cell::{Cell, Tool};
pub use error::SimulationError;
pub use stats::{CountingStats, NoopStats, SimStats};
pub use world::{DEFAULT_HEIGHT, DEFAULT_WIDTH, World};
