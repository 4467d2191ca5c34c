//! Circular brush painting

use crate::{Tool, World};

impl World {
    /// Paint a disc of the tool's cell centred on (x, y)
    ///
    /// The disc has radius `brush / 2` and is sampled at cell centres offset
    /// by half a cell, so even brush sizes produce symmetric blocks and a
    /// brush of 0 or 1 writes nothing. Cells outside the world are skipped.
    /// Returns the number of cells written.
    pub fn paint(&mut self, x: i32, y: i32, brush: u32, tool: Tool) -> usize {
        let (cx, cy) = (i64::from(x), i64::from(y));
        let reach = i64::from(brush);
        let radius = f64::from(brush) / 2.0;
        let radius_sq = radius * radius;
        let cell = tool.cell();
        let mut written = 0;

        // Only the part of the bounding square that overlaps the grid
        let columns = (cx - reach).max(0)..=(cx + reach).min(self.width() as i64 - 1);
        let rows = (cy - reach).max(0)..=(cy + reach).min(self.height() as i64 - 1);

        for py in rows {
            for px in columns.clone() {
                let ox = (px - cx) as f64 + 0.5;
                let oy = (py - cy) as f64 + 0.5;
                if ox * ox + oy * oy <= radius_sq {
                    self.put(px as usize, py as usize, cell);
                    written += 1;
                }
            }
        }

        written
    }
}
