//! World - the fixed cell grid

use crate::{Cell, SimulationError};

/// Default grid width in cells
pub const DEFAULT_WIDTH: usize = 200;

/// Default grid height in cells
pub const DEFAULT_HEIGHT: usize = 150;

/// A fixed-size grid of cells
///
/// Cells are stored row-major. Row 0 is the top of the world and y grows
/// downward, matching canvas coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl World {
    /// Create an empty world
    pub fn new(width: usize, height: usize) -> Result<Self, SimulationError> {
        if width == 0 || height == 0 {
            return Err(SimulationError::InvalidDimensions { width, height });
        }

        log::debug!("Creating {}x{} world", width, height);

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Get the cell at (x, y), or None when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set the cell at (x, y). Returns false when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Reset every cell to empty
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Count cells of the given kind
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Row-major index for in-bounds coordinates
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Unchecked access for the update loop, which stays in bounds
    pub(crate) fn at(&self, x: usize, y: usize) -> Cell {
        self.cells[y * self.width + x]
    }

    pub(crate) fn put(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y * self.width + x] = cell;
    }
}

impl Default for World {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cells: vec![Cell::Empty; DEFAULT_WIDTH * DEFAULT_HEIGHT],
        }
    }
}
