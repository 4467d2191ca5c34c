//! Pointer input mapping from canvas space to world cells

use particulate_simulation::Tool;

/// DOM value of `MouseEvent.button` / `MouseEvent.buttons` for the secondary button
const SECONDARY_BUTTON: i32 = 2;

/// Canvas backing size and its on-screen bounding rectangle
///
/// The canvas may be scaled by CSS, so client coordinates are first mapped
/// into backing pixels before being divided into cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    /// Backing store width (`canvas.width`)
    pub canvas_width: f64,
    /// Backing store height (`canvas.height`)
    pub canvas_height: f64,
    /// Bounding client rect left edge
    pub left: f64,
    /// Bounding client rect top edge
    pub top: f64,
    /// Bounding client rect width
    pub rect_width: f64,
    /// Bounding client rect height
    pub rect_height: f64,
}

impl CanvasGeometry {
    /// Map a client-space position to world cell coordinates
    ///
    /// Returns None when the canvas has no on-screen area.
    pub fn locate(&self, client_x: f64, client_y: f64, cell_size: usize) -> Option<(i32, i32)> {
        if self.rect_width <= 0.0 || self.rect_height <= 0.0 {
            return None;
        }

        let scale_x = self.canvas_width / self.rect_width;
        let scale_y = self.canvas_height / self.rect_height;
        let px = ((client_x - self.left) * scale_x).floor() as i32;
        let py = ((client_y - self.top) * scale_y).floor() as i32;
        let cell_size = cell_size.max(1) as i32;

        Some((px.div_euclid(cell_size), py.div_euclid(cell_size)))
    }
}

/// Pick the tool for a mouse event: the secondary button erases
pub fn tool_for_buttons(button: i32, buttons: i32) -> Tool {
    if button == SECONDARY_BUTTON || buttons == SECONDARY_BUTTON {
        Tool::Erase
    } else {
        Tool::Sand
    }
}
