//! Cellular automaton update - sand movement

use crate::{Cell, SimStats, World};

impl World {
    /// Advance the simulation by one generation
    ///
    /// Rows are swept from the second-to-last row up to the top, so a grain
    /// that lands in row `y + 1` has already been visited and cannot move
    /// twice in the same step. Within a row cells are visited left to right.
    pub fn step(&mut self, stats: &mut dyn SimStats) {
        let (width, height) = (self.width(), self.height());
        if height < 2 {
            return;
        }

        for y in (0..height - 1).rev() {
            for x in 0..width {
                if self.at(x, y) == Cell::Sand {
                    self.update_sand(x, y, stats);
                }
            }
        }
    }

    /// Sand falls straight down, else slides down-left, else down-right
    fn update_sand(&mut self, x: usize, y: usize, stats: &mut dyn SimStats) {
        let below = y + 1;

        if self.at(x, below).is_empty() {
            self.move_cell(x, y, x, below, stats);
        } else if x > 0 && self.at(x - 1, below).is_empty() {
            self.move_cell(x, y, x - 1, below, stats);
        } else if x + 1 < self.width() && self.at(x + 1, below).is_empty() {
            self.move_cell(x, y, x + 1, below, stats);
        }
    }

    fn move_cell(
        &mut self,
        from_x: usize,
        from_y: usize,
        to_x: usize,
        to_y: usize,
        stats: &mut dyn SimStats,
    ) {
        let cell = self.at(from_x, from_y);
        self.put(to_x, to_y, cell);
        self.put(from_x, from_y, Cell::Empty);
        stats.record_cell_moved();
    }
}
