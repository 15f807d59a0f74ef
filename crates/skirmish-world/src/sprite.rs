//! Sprite handles and the per-frame renderable images built from them.

use serde::{Deserialize, Serialize};

use crate::geometry::Float2;

/// Opaque handle to a pre-decoded sprite owned by the rasterization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// A pre-decoded 2D image: its backend handle plus its pixel bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: SpriteId,
    /// Width and height of the image in world units.
    pub size: Float2,
}

impl Sprite {
    pub const fn new(id: SpriteId, width: f32, height: f32) -> Self {
        Self {
            id,
            size: Float2::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// One image an actor or effect wants drawn this frame.
///
/// `position` is the sprite's top-left anchor in world coordinates and
/// `palette` selects the color remap the backend applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub sprite: Sprite,
    pub position: Float2,
    pub palette: usize,
}

impl Renderable {
    pub const fn new(sprite: Sprite, position: Float2, palette: usize) -> Self {
        Self {
            sprite,
            position,
            palette,
        }
    }
}
