//! Skirmish Render -- per-frame scene composition for the top-down world.
//!
//! This crate decides *what* is visible, *in which order* it is drawn, and
//! *how* selection and status overlays are composited over world sprites.
//! Pixels are someone else's job: everything is submitted to a
//! [`SpriteSink`](sink::SpriteSink) and a [`LineSink`](sink::LineSink), which
//! defer work until an explicit flush.
//!
//! # Frame sequence
//!
//! [`WorldRenderer::render_frame`](frame::WorldRenderer::render_frame) runs a
//! fixed sequence each frame:
//!
//! 1. Terrain for the viewport.
//! 2. Actors (back to front), roofs, then effects, culled against the
//!    viewport ([`composer`]).
//! 3. The persistent UI overlay, followed by a sprite flush.
//! 4. The drag-selection box and the brackets of the actors inside it
//!    ([`overlay`]).
//! 5. The active order overlay, if any.
//! 6. A line flush, then a final sprite flush.
//!
//! # Headless use
//!
//! The [`headless`] module provides recording sinks and collaborators that
//! log every draw call, which is how the test suite verifies layering without
//! a GPU. The `renderer` feature adds a wgpu debug backend in `gpu`.
//!
//! ```
//! use skirmish_render::prelude::*;
//! use skirmish_world::prelude::*;
//!
//! let sheet = SpriteSheet::standard_pips(SpriteId(900));
//! let (mut renderer, log) = headless_renderer(Rules::default(), &sheet).unwrap();
//!
//! let world = World::new();
//! let viewport = Viewport::new(0.0, 0.0, 100.0, 100.0);
//! renderer.render_frame(Frame::new(&viewport, &world, PlayerId(1)), &RenderConfig::default());
//!
//! assert_eq!(log.events()[0], DrawEvent::Terrain { viewport: viewport.rect() });
//! ```

#![deny(unsafe_code)]

pub mod animation;
pub mod color;
pub mod composer;
pub mod frame;
#[cfg(feature = "renderer")]
pub mod gpu;
pub mod headless;
pub mod overlay;
pub mod sink;
pub mod status;
pub mod viewport;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while setting up a renderer.
///
/// Drawing itself never fails: once a [`WorldRenderer`](frame::WorldRenderer)
/// exists, every frame is best-effort.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A frame name from the rules has no sequence in the sprite sheet.
    #[error("sprite sheet '{sheet}' has no sequence '{sequence}'")]
    MissingSequence {
        sheet: String,
        sequence: String,
    },

    /// A sequence exists but holds no frames.
    #[error("sequence '{sequence}' in sprite sheet '{sheet}' has no frames")]
    EmptySequence {
        sheet: String,
        sequence: String,
    },

    /// The rules failed validation.
    #[error(transparent)]
    World(#[from] skirmish_world::WorldError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::animation::{Animation, SpriteSheet};
    pub use crate::color::Color;
    pub use crate::composer::{compose, draw_order, ComposeStats};
    pub use crate::frame::{
        Frame, FrameStats, OrderOverlay, RenderConfig, TerrainRenderer, UiOverlay, WorldRenderer,
    };
    pub use crate::headless::{
        headless_renderer, DrawEvent, FrameLog, HeadlessRenderer, RecordingLines,
        RecordingSprites, RecordingTerrain, RecordingUi,
    };
    pub use crate::overlay::{health_color, health_fraction, Overlay};
    pub use crate::sink::{LineSink, SpriteSink};
    pub use crate::status::StatusSprites;
    pub use crate::viewport::Viewport;
    pub use crate::RenderError;
}
