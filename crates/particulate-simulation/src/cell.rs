//! Cell and tool types

use serde::{Deserialize, Serialize};

/// Contents of a single grid cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Sand,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// What a brush stroke writes into the world
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Sand,
    Erase,
}

impl Tool {
    /// The cell this tool paints
    pub fn cell(self) -> Cell {
        match self {
            Tool::Sand => Cell::Sand,
            Tool::Erase => Cell::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cell_is_empty() {
        assert!(Cell::default().is_empty());
        assert!(!Cell::Sand.is_empty());
    }

    #[test]
    fn test_tool_cells() {
        assert_eq!(Tool::Sand.cell(), Cell::Sand);
        assert_eq!(Tool::Erase.cell(), Cell::Empty);
    }
}
