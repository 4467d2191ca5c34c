//! CPU frame buffer renderer
//!
//! Renders the world into an RGBA pixel buffer without GPU dependencies.
//! The browser copies the buffer onto the canvas; the headless runner
//! encodes it as a PNG.

use particulate_simulation::{Cell, World};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Colours used for each cell kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: [u8; 4],
    pub sand: [u8; 4],
}

impl Palette {
    pub fn color(&self, cell: Cell) -> [u8; 4] {
        match cell {
            Cell::Empty => self.background,
            Cell::Sand => self.sand,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [0, 0, 0, 255],
            sand: [0xe2, 0xc2, 0x75, 255], // #e2c275
        }
    }
}

/// RGBA pixel buffer with one square block per world cell
pub struct FrameBuffer {
    columns: usize,
    rows: usize,
    cell_size: usize,
    palette: Palette,
    /// RGBA pixel buffer (4 bytes per pixel)
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Create a buffer for a `columns` x `rows` world drawn at `cell_size`
    ///
    /// A cell size of zero is treated as one.
    pub fn new(columns: usize, rows: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        let mut frame = Self {
            columns,
            rows,
            cell_size,
            palette: Palette::default(),
            pixels: vec![0u8; columns * rows * cell_size * cell_size * 4],
        };
        frame.fill_background();
        frame
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self.fill_background();
        self
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.columns * self.cell_size
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.rows * self.cell_size
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value of the pixel at (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let idx = (y * self.width() + x) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(rgba)
    }

    /// Get RGB buffer (without alpha)
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Draw the world. Cells beyond the buffer's grid are ignored.
    pub fn render(&mut self, world: &World) {
        let row_bytes = self.width() * 4;
        if row_bytes == 0 {
            return;
        }

        let columns = self.columns.min(world.width());
        let cell_size = self.cell_size;
        let palette = self.palette;
        let draw_row = |(py, row): (usize, &mut [u8])| {
            let cy = py / cell_size;
            for (cx, block) in row.chunks_exact_mut(cell_size * 4).enumerate() {
                let cell = if cx < columns {
                    world.get(cx as i32, cy as i32).unwrap_or_default()
                } else {
                    Cell::Empty
                };
                let color = palette.color(cell);
                for px in block.chunks_exact_mut(4) {
                    px.copy_from_slice(&color);
                }
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.pixels
            .par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(draw_row);

        #[cfg(target_arch = "wasm32")]
        self.pixels
            .chunks_mut(row_bytes)
            .enumerate()
            .for_each(draw_row);
    }

    fn fill_background(&mut self) {
        let color = self.palette.background;
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }
}
