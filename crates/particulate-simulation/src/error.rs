use thiserror::Error;

/// Errors raised while building a simulation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    /// Width or height was zero
    #[error("invalid world dimensions {width}x{height}: both must be non-zero")]
    InvalidDimensions { width: usize, height: usize },
}
