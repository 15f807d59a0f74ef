//! Headless backend: sinks and collaborators that record every call.
//!
//! All recorders created from one [`FrameLog`] append to the same shared
//! event list, so the log shows the exact interleaving of terrain, sprite,
//! line, UI and flush calls within a frame. The test suite and the
//! `headless_scene` example run on this backend.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use skirmish_world::geometry::{Float2, Rect};
use skirmish_world::rules::Rules;
use skirmish_world::sprite::{Renderable, Sprite, SpriteId};

use crate::animation::SpriteSheet;
use crate::color::Color;
use crate::frame::{TerrainRenderer, UiOverlay, WorldRenderer};
use crate::sink::{LineBatch, LineSink, SpriteBatch, SpriteSink};
use crate::viewport::Viewport;
use crate::RenderError;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawEvent {
    /// The terrain was drawn for this world-space rectangle.
    Terrain { viewport: Rect },
    Sprite {
        sprite: SpriteId,
        position: Float2,
        palette: usize,
    },
    Line {
        a: Float2,
        b: Float2,
        color_a: Color,
        color_b: Color,
    },
    /// The UI overlay started drawing.
    Ui,
    /// The sprite batch was committed with `count` sprites in it.
    FlushSprites { count: usize },
    /// The line batch was committed with `count` segments in it.
    FlushLines { count: usize },
}

impl DrawEvent {
    pub fn is_flush(&self) -> bool {
        matches!(self, DrawEvent::FlushSprites { .. } | DrawEvent::FlushLines { .. })
    }
}

// ---------------------------------------------------------------------------
// FrameLog
// ---------------------------------------------------------------------------

/// Shared, append-only list of [`DrawEvent`]s.
///
/// Cloning the log clones the handle, not the events.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    events: Rc<RefCell<Vec<DrawEvent>>>,
}

impl FrameLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: DrawEvent) {
        self.events.borrow_mut().push(event);
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<DrawEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<DrawEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Ids of every recorded sprite, in submission order.
    pub fn sprite_ids(&self) -> Vec<SpriteId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DrawEvent::Sprite { sprite, .. } => Some(*sprite),
                _ => None,
            })
            .collect()
    }

    /// Every recorded line segment, in submission order.
    pub fn lines(&self) -> Vec<(Float2, Float2, Color)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                DrawEvent::Line { a, b, color_a, .. } => Some((*a, *b, *color_a)),
                _ => None,
            })
            .collect()
    }

    /// Serialize the recorded events as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&*self.events.borrow())
    }
}

// ---------------------------------------------------------------------------
// Recording sinks
// ---------------------------------------------------------------------------

/// Sprite sink that logs each sprite as it is queued and each flush with
/// the batch size it committed.
#[derive(Debug)]
pub struct RecordingSprites {
    log: FrameLog,
    batch: SpriteBatch,
}

impl RecordingSprites {
    pub fn new(log: FrameLog) -> Self {
        Self {
            log,
            batch: SpriteBatch::new(),
        }
    }

    /// Sprites queued since the last flush.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }
}

impl SpriteSink for RecordingSprites {
    fn draw_sprite(&mut self, sprite: Sprite, position: Float2, palette: usize) {
        self.batch.push(sprite, position, palette);
        self.log.push(DrawEvent::Sprite {
            sprite: sprite.id,
            position,
            palette,
        });
    }

    fn flush(&mut self) {
        let count = self.batch.take().len();
        self.log.push(DrawEvent::FlushSprites { count });
    }
}

/// Line sink counterpart of [`RecordingSprites`].
#[derive(Debug)]
pub struct RecordingLines {
    log: FrameLog,
    batch: LineBatch,
}

impl RecordingLines {
    pub fn new(log: FrameLog) -> Self {
        Self {
            log,
            batch: LineBatch::new(),
        }
    }

    /// Segments queued since the last flush.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }
}

impl LineSink for RecordingLines {
    fn draw_line(&mut self, a: Float2, b: Float2, color_a: Color, color_b: Color) {
        self.batch.push(a, b, color_a, color_b);
        self.log.push(DrawEvent::Line {
            a,
            b,
            color_a,
            color_b,
        });
    }

    fn flush(&mut self) {
        let count = self.batch.take().len();
        self.log.push(DrawEvent::FlushLines { count });
    }
}

// ---------------------------------------------------------------------------
// Recording collaborators
// ---------------------------------------------------------------------------

/// Terrain renderer that records the rectangle it was asked to cover.
#[derive(Debug)]
pub struct RecordingTerrain {
    log: FrameLog,
}

impl RecordingTerrain {
    pub fn new(log: FrameLog) -> Self {
        Self { log }
    }
}

impl TerrainRenderer for RecordingTerrain {
    fn draw(&mut self, viewport: &Viewport) {
        self.log.push(DrawEvent::Terrain {
            viewport: viewport.rect(),
        });
    }
}

/// UI overlay that records a [`DrawEvent::Ui`] marker and then draws a
/// fixed set of screen images into the sprite batch.
#[derive(Debug)]
pub struct RecordingUi {
    log: FrameLog,
    images: Vec<Renderable>,
}

impl RecordingUi {
    pub fn new(log: FrameLog) -> Self {
        Self {
            log,
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<Renderable>) -> Self {
        self.images = images;
        self
    }
}

impl UiOverlay for RecordingUi {
    fn draw(&mut self, sprites: &mut dyn SpriteSink) {
        self.log.push(DrawEvent::Ui);
        for image in &self.images {
            sprites.draw_sprite(image.sprite, image.position, image.palette);
        }
    }
}

/// A [`WorldRenderer`] wired entirely to recorders.
pub type HeadlessRenderer = WorldRenderer<RecordingSprites, RecordingLines>;

/// Build a [`HeadlessRenderer`] with an empty UI, returning it together with
/// the log every one of its recorders writes to.
pub fn headless_renderer(
    rules: Rules,
    pip_sheet: &SpriteSheet,
) -> Result<(HeadlessRenderer, FrameLog), RenderError> {
    let log = FrameLog::new();
    let renderer = WorldRenderer::new(
        RecordingSprites::new(log.clone()),
        RecordingLines::new(log.clone()),
        Box::new(RecordingTerrain::new(log.clone())),
        Box::new(RecordingUi::new(log.clone())),
        rules,
        pip_sheet,
    )?;
    Ok((renderer, log))
}
