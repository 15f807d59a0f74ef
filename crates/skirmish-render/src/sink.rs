//! Batch sink contracts.
//!
//! A sink accumulates primitives and commits them on [`flush`](SpriteSink::flush).
//! Sinks never cull: the caller is responsible for dropping anything outside
//! the viewport before it gets here.
//!
//! [`SpriteBatch`] and [`LineBatch`] are plain accumulators that concrete
//! sinks build on.

use serde::{Deserialize, Serialize};
use skirmish_world::geometry::Float2;
use skirmish_world::sprite::Sprite;

use crate::color::Color;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Accepts sprites for deferred, batched drawing.
pub trait SpriteSink {
    /// Queue `sprite` with its top-left corner at `position`, drawn with the
    /// color remap `palette`.
    fn draw_sprite(&mut self, sprite: Sprite, position: Float2, palette: usize);

    /// Commit everything queued so far as one batch.
    fn flush(&mut self);
}

/// Accepts line segments for deferred, batched drawing.
///
/// Each end of a segment carries its own color; the backend interpolates.
pub trait LineSink {
    fn draw_line(&mut self, a: Float2, b: Float2, color_a: Color, color_b: Color);

    /// Commit everything queued so far as one batch.
    fn flush(&mut self);
}

impl<T: SpriteSink + ?Sized> SpriteSink for Box<T> {
    fn draw_sprite(&mut self, sprite: Sprite, position: Float2, palette: usize) {
        (**self).draw_sprite(sprite, position, palette);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

impl<T: LineSink + ?Sized> LineSink for Box<T> {
    fn draw_line(&mut self, a: Float2, b: Float2, color_a: Color, color_b: Color) {
        (**self).draw_line(a, b, color_a, color_b);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

// ---------------------------------------------------------------------------
// Queued primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedSprite {
    pub sprite: Sprite,
    pub position: Float2,
    pub palette: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedLine {
    pub a: Float2,
    pub b: Float2,
    pub color_a: Color,
    pub color_b: Color,
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// Sprites queued since the last flush, in submission order.
#[derive(Debug, Default)]
pub struct SpriteBatch {
    queued: Vec<QueuedSprite>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sprite: Sprite, position: Float2, palette: usize) {
        self.queued.push(QueuedSprite {
            sprite,
            position,
            palette,
        });
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Take the queued sprites, leaving the batch empty.
    pub fn take(&mut self) -> Vec<QueuedSprite> {
        std::mem::take(&mut self.queued)
    }
}

/// Line segments queued since the last flush, in submission order.
#[derive(Debug, Default)]
pub struct LineBatch {
    queued: Vec<QueuedLine>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, a: Float2, b: Float2, color_a: Color, color_b: Color) {
        self.queued.push(QueuedLine {
            a,
            b,
            color_a,
            color_b,
        });
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Take the queued lines, leaving the batch empty.
    pub fn take(&mut self) -> Vec<QueuedLine> {
        std::mem::take(&mut self.queued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_world::sprite::SpriteId;

    #[test]
    fn batches_keep_submission_order_and_drain() {
        let mut sprites = SpriteBatch::new();
        let s = Sprite::new(SpriteId(1), 8.0, 8.0);
        sprites.push(s, Float2::new(1.0, 0.0), 0);
        sprites.push(s, Float2::new(2.0, 0.0), 3);
        assert_eq!(sprites.len(), 2);

        let drained = sprites.take();
        assert!(sprites.is_empty());
        assert_eq!(drained[1].position, Float2::new(2.0, 0.0));
        assert_eq!(drained[1].palette, 3);

        let mut lines = LineBatch::new();
        lines.push(Float2::ZERO, Float2::new(4.0, 0.0), Color::RED, Color::GRAY);
        let drained = lines.take();
        assert!(lines.is_empty());
        assert_eq!(drained[0].color_b, Color::GRAY);
    }
}
