//! The camera's view onto the world.

use serde::{Deserialize, Serialize};
use skirmish_world::geometry::{Float2, Rect};

/// Visible area of the world: top-left location plus size, in world units.
///
/// Owned and moved by the camera controller; the renderer only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub location: Float2,
    pub size: Float2,
}

impl Viewport {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            location: Float2::new(x, y),
            size: Float2::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// The rectangle used for culling.
    pub fn rect(&self) -> Rect {
        Rect::new(self.location.x, self.location.y, self.size.x, self.size.y)
    }

    /// Move the view by `delta` world units.
    pub fn scroll(&mut self, delta: Float2) {
        self.location += delta;
    }

    /// Produce a column-major 4x4 orthographic projection matrix.
    ///
    /// Maps the viewport to clip space with the top edge at `+1` and the
    /// left edge at `-1`, so world y grows down the screen.
    pub fn projection_matrix(&self) -> [f32; 16] {
        let sx = 2.0 / self.size.x;
        let sy = -2.0 / self.size.y;
        let tx = -1.0 - self.location.x * sx;
        let ty = 1.0 - self.location.y * sy;

        [
            sx, 0.0, 0.0, 0.0, // column 0
            0.0, sy, 0.0, 0.0, // column 1
            0.0, 0.0, 1.0, 0.0, // column 2
            tx, ty, 0.0, 1.0, // column 3
        ]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 640.0, 400.0)
    }
}
