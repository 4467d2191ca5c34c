//! Simulation statistics collection trait

/// Trait for collecting simulation statistics
///
/// Lets callers observe what a step did without the world owning any
/// counters of its own.
pub trait SimStats {
    /// Record that a cell was moved during a step
    fn record_cell_moved(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_cell_moved(&mut self) {}
}

/// Counts moves across any number of steps
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingStats {
    pub cells_moved: u64,
}

impl CountingStats {
    pub fn reset(&mut self) {
        self.cells_moved = 0;
    }
}

impl SimStats for CountingStats {
    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }
}
