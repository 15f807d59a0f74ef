//! The per-frame orchestrator.
//!
//! [`WorldRenderer`] owns the two batch sinks plus the terrain and UI
//! collaborators, and runs the fixed frame sequence:
//!
//! ```text
//! terrain -> actors/roofs/effects -> UI -> flush sprites
//!         -> drag box + brackets -> order overlay -> flush lines -> flush sprites
//! ```
//!
//! The sequence is not reorderable: everything before the first flush is the
//! background layer, and the overlays drawn after it mix sprite and line
//! primitives that both have to reach the screen before the frame ends.

use serde::{Deserialize, Serialize};
use skirmish_world::actor::PlayerId;
use skirmish_world::rules::Rules;
use skirmish_world::world::{SelectionBox, World};

use crate::animation::SpriteSheet;
use crate::color::Color;
use crate::composer::{self, ComposeStats};
use crate::overlay::Overlay;
use crate::sink::{LineSink, SpriteSink};
use crate::status::StatusSprites;
use crate::viewport::Viewport;
use crate::RenderError;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Draws the terrain tiles under the viewport. Does its own batching.
pub trait TerrainRenderer {
    fn draw(&mut self, viewport: &Viewport);
}

/// Persistent screen overlay (minimap, placement grid, ...), drawn into the
/// sprite batch right before it is flushed.
pub trait UiOverlay {
    fn draw(&mut self, sprites: &mut dyn SpriteSink);
}

/// The active interaction mode, e.g. unit orders or building placement.
///
/// Runs after the selection box and may draw status frames for the current
/// selection through `overlay`.
pub trait OrderOverlay {
    fn render(&mut self, world: &World, overlay: &mut Overlay<'_>);
}

// ---------------------------------------------------------------------------
// RenderConfig
// ---------------------------------------------------------------------------

/// Switches passed in with every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Trace the planned path of every actor that gets a selection frame.
    pub show_unit_paths: bool,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Everything one frame reads from the rest of the game.
pub struct Frame<'a> {
    pub viewport: &'a Viewport,
    pub world: &'a World,
    /// The player looking at the screen.
    pub local_player: PlayerId,
    /// In-progress drag selection, if any.
    pub selection_box: Option<SelectionBox>,
    /// The active interaction overlay, if any.
    pub order_overlay: Option<&'a mut dyn OrderOverlay>,
}

impl<'a> Frame<'a> {
    pub fn new(viewport: &'a Viewport, world: &'a World, local_player: PlayerId) -> Self {
        Self {
            viewport,
            world,
            local_player,
            selection_box: None,
            order_overlay: None,
        }
    }

    pub fn with_selection_box(mut self, selection_box: SelectionBox) -> Self {
        self.selection_box = Some(selection_box);
        self
    }

    pub fn with_order_overlay(mut self, order_overlay: &'a mut dyn OrderOverlay) -> Self {
        self.order_overlay = Some(order_overlay);
        self
    }
}

/// What a rendered frame contained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub scene: ComposeStats,
    /// Actors that received a bracket from the drag selection.
    pub boxed_actors: usize,
}

// ---------------------------------------------------------------------------
// WorldRenderer
// ---------------------------------------------------------------------------

/// Draws the world, its overlays, and the UI, one frame per call.
pub struct WorldRenderer<S, L> {
    sprites: S,
    lines: L,
    terrain: Box<dyn TerrainRenderer>,
    ui: Box<dyn UiOverlay>,
    rules: Rules,
    status: StatusSprites,
}

impl<S: SpriteSink, L: LineSink> WorldRenderer<S, L> {
    /// Build a renderer, validating `rules` and resolving every pip and tag
    /// frame against `pip_sheet`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::World`] when the rules are invalid and
    /// [`RenderError::MissingSequence`] / [`RenderError::EmptySequence`]
    /// when a frame name cannot be resolved.
    pub fn new(
        sprites: S,
        lines: L,
        terrain: Box<dyn TerrainRenderer>,
        ui: Box<dyn UiOverlay>,
        rules: Rules,
        pip_sheet: &SpriteSheet,
    ) -> Result<Self, RenderError> {
        rules.validate()?;
        let status = StatusSprites::resolve(pip_sheet, &rules)?;
        tracing::debug!(
            condition_red = rules.general.condition_red,
            condition_yellow = rules.general.condition_yellow,
            cell_size = rules.general.cell_size,
            "world renderer created"
        );
        Ok(Self {
            sprites,
            lines,
            terrain,
            ui,
            rules,
            status,
        })
    }

    /// Render one frame. Call exactly once per displayed frame.
    pub fn render_frame(&mut self, frame: Frame<'_>, config: &RenderConfig) -> FrameStats {
        let mut stats = FrameStats::default();

        self.terrain.draw(frame.viewport);

        let rect = frame.viewport.rect();
        stats.scene = composer::compose(&mut self.sprites, &rect, frame.world);

        self.ui.draw(&mut self.sprites);

        self.sprites.flush();

        let mut overlay = Overlay::new(
            &mut self.sprites,
            &mut self.lines,
            &self.rules,
            &self.status,
            frame.local_player,
            config,
        );

        if let Some(selection) = &frame.selection_box {
            overlay.draw_drag_box(selection, Color::WHITE);

            for actor in frame.world.actors_in_box(selection.first, selection.second) {
                overlay.draw_selection_box(actor, Color::YELLOW, false);
                stats.boxed_actors += 1;
            }
        }

        if let Some(order_overlay) = frame.order_overlay {
            order_overlay.render(frame.world, &mut overlay);
        }

        self.lines.flush();
        self.sprites.flush();

        tracing::trace!(
            submitted = stats.scene.submitted,
            culled = stats.scene.culled,
            boxed = stats.boxed_actors,
            "frame rendered"
        );
        stats
    }

    /// An overlay painter over this renderer's sinks, for drawing status
    /// frames outside [`render_frame`](Self::render_frame). The caller is
    /// responsible for flushing afterwards.
    pub fn overlay(&mut self, viewer: PlayerId, config: &RenderConfig) -> Overlay<'_> {
        Overlay::new(
            &mut self.sprites,
            &mut self.lines,
            &self.rules,
            &self.status,
            viewer,
            config,
        )
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn sprites(&self) -> &S {
        &self.sprites
    }

    pub fn sprites_mut(&mut self) -> &mut S {
        &mut self.sprites
    }

    pub fn lines(&self) -> &L {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }
}
