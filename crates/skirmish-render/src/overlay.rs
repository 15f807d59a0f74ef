//! Selection and status overlays drawn over the world.
//!
//! An [`Overlay`] borrows both sinks for the rest of a frame and draws, for a
//! given actor:
//!
//! - the selection frame: four L-shaped corner brackets;
//! - the health bar over the top edge of the frame;
//! - pip rows under the bottom-left corner and the tag column at the top
//!   center, shown only to the actor's owner;
//! - the planned path, when path display is switched on.
//!
//! Which of these appear depends on the capabilities the actor carries. A
//! missing capability simply means that element is not drawn.

use skirmish_world::actor::{Actor, PlayerId};
use skirmish_world::capability::{PathProvider, PipProvider, TagProvider};
use skirmish_world::geometry::Float2;
use skirmish_world::rules::{GeneralRules, Rules};
use skirmish_world::world::SelectionBox;

use crate::color::Color;
use crate::frame::RenderConfig;
use crate::sink::{LineSink, SpriteSink};
use crate::status::StatusSprites;

/// Length of each arm of a selection bracket.
pub const BRACKET_ARM: f32 = 4.0;

/// Offset from the bottom-left corner to the first pip, compensating for the
/// registration point of the pip frames.
pub const PIP_ORIGIN: Float2 = Float2::new(-12.0, -7.0);
/// Horizontal advance per pip.
pub const PIP_ADVANCE: f32 = 4.0;
/// Vertical step when a row of pips wraps.
pub const PIP_WRAP_STEP: f32 = 4.0;
/// Vertical step between the rows of two pip sources.
pub const PIP_ROW_STEP: f32 = 5.0;

/// Offset from the top-center of the frame to the first tag.
pub const TAG_ORIGIN: Float2 = Float2::new(-16.0, 2.0);
/// Vertical advance per tag.
pub const TAG_ADVANCE: f32 = 8.0;

/// Health as a fraction of maximum strength, in `[0, 1]`.
///
/// An actor without a maximum strength counts as fully healthy.
pub fn health_fraction(actor: &Actor) -> f32 {
    if actor.max_strength == 0 {
        return 1.0;
    }
    (actor.health as f32 / actor.max_strength as f32).clamp(0.0, 1.0)
}

/// Bar color for a health fraction. Both thresholds are exclusive upper
/// bounds: a fraction exactly at a threshold gets the healthier color.
pub fn health_color(fraction: f32, rules: &GeneralRules) -> Color {
    if fraction < rules.condition_red {
        Color::RED
    } else if fraction < rules.condition_yellow {
        Color::YELLOW
    } else {
        Color::LIME_GREEN
    }
}

/// Overlay painter for the remainder of one frame.
pub struct Overlay<'a> {
    sprites: &'a mut dyn SpriteSink,
    lines: &'a mut dyn LineSink,
    rules: &'a Rules,
    status: &'a StatusSprites,
    viewer: PlayerId,
    show_unit_paths: bool,
}

impl<'a> Overlay<'a> {
    pub fn new(
        sprites: &'a mut dyn SpriteSink,
        lines: &'a mut dyn LineSink,
        rules: &'a Rules,
        status: &'a StatusSprites,
        viewer: PlayerId,
        config: &RenderConfig,
    ) -> Self {
        Self {
            sprites,
            lines,
            rules,
            status,
            viewer,
            show_unit_paths: config.show_unit_paths,
        }
    }

    /// The player looking at the screen.
    pub fn viewer(&self) -> PlayerId {
        self.viewer
    }

    /// Direct access to the sprite sink, for overlays that draw their own
    /// markers.
    pub fn sprites(&mut self) -> &mut (dyn SpriteSink + 'a) {
        &mut *self.sprites
    }

    /// Direct access to the line sink.
    pub fn lines(&mut self) -> &mut (dyn LineSink + 'a) {
        &mut *self.lines
    }

    fn line(&mut self, a: Float2, b: Float2, color: Color) {
        self.lines.draw_line(a, b, color, color);
    }

    /// Outline of an in-progress drag selection, edge to edge.
    pub fn draw_drag_box(&mut self, selection: &SelectionBox, color: Color) {
        let a = selection.first;
        let b = Float2::new(selection.second.x - a.x, 0.0);
        let c = Float2::new(0.0, selection.second.y - a.y);

        self.line(a, a + b, color);
        self.line(a + b, a + b + c, color);
        self.line(a + b + c, a + c, color);
        self.line(a, a + c, color);
    }

    /// Corner brackets around `actor`, optionally with its status bar, pips
    /// and tags, plus its path when path display is on.
    pub fn draw_selection_box(&mut self, actor: &Actor, color: Color, with_status_bar: bool) {
        let center = actor.center;
        let half = actor.selected_size * 0.5;

        let top_left = center - half;
        let bottom_right = center + half;
        let top_right = Float2::new(bottom_right.x, top_left.y);
        let bottom_left = Float2::new(top_left.x, bottom_right.y);

        let arm = BRACKET_ARM;
        self.line(top_left, top_left + Float2::new(arm, 0.0), color);
        self.line(top_left, top_left + Float2::new(0.0, arm), color);
        self.line(top_right, top_right + Float2::new(-arm, 0.0), color);
        self.line(top_right, top_right + Float2::new(0.0, arm), color);

        self.line(bottom_left, bottom_left + Float2::new(arm, 0.0), color);
        self.line(bottom_left, bottom_left + Float2::new(0.0, -arm), color);
        self.line(bottom_right, bottom_right + Float2::new(-arm, 0.0), color);
        self.line(bottom_right, bottom_right + Float2::new(0.0, -arm), color);

        if with_status_bar {
            self.draw_health_bar(actor, top_left, top_right);

            // Opponents never see pips or tags.
            if actor.owner == self.viewer {
                self.draw_pips(actor, bottom_left);
                self.draw_tags(actor, Float2::new(center.x, top_left.y));
            }
        }

        if self.show_unit_paths {
            self.draw_path(actor);
        }
    }

    /// Three-line health bar spanning `top_left`..`top_right`, just above
    /// the selection frame.
    ///
    /// Always seven segments: two gray end ticks, two gray "missing health"
    /// segments, then the bright center line with a darker line above and
    /// below it.
    pub fn draw_health_bar(&mut self, actor: &Actor, top_left: Float2, top_right: Float2) {
        let gray = Color::GRAY;
        let up2 = Float2::new(0.0, -2.0);
        let up3 = Float2::new(0.0, -3.0);
        let up4 = Float2::new(0.0, -4.0);

        self.line(top_left + up2, top_left + up4, gray);
        self.line(top_right + up2, top_right + up4, gray);

        let fraction = health_fraction(actor);
        let bright = health_color(fraction, &self.rules.general);
        let dark = bright.halved();

        let z = Float2::lerp(top_left, top_right, fraction);

        self.line(z + up4, top_right + up4, gray);
        self.line(z + up2, top_right + up2, gray);

        self.line(top_left + up3, z + up3, bright);
        self.line(top_left + up2, z + up2, dark);
        self.line(top_left + up4, z + up4, dark);
    }

    /// One row of pips per [`PipProvider`], starting under `base`.
    pub fn draw_pips(&mut self, actor: &Actor, base: Float2) {
        let origin = base + PIP_ORIGIN;
        let mut offset = Float2::ZERO;
        let width = actor.selected_size.x;

        for source in actor.capabilities().all::<dyn PipProvider>() {
            for pip in source.pips() {
                self.sprites
                    .draw_sprite(self.status.pip(pip), origin + offset, 0);
                offset.x += PIP_ADVANCE;

                // Wrap before the next pip would stick out of the frame.
                if offset.x + PIP_ADVANCE > width {
                    offset.x = 0.0;
                    offset.y -= PIP_WRAP_STEP;
                }
            }
            offset.x = 0.0;
            offset.y -= PIP_ROW_STEP;
        }
    }

    /// Every tag of every [`TagProvider`], stacked downward from `base`.
    pub fn draw_tags(&mut self, actor: &Actor, base: Float2) {
        let origin = base + TAG_ORIGIN;
        let mut offset = Float2::ZERO;

        for source in actor.capabilities().all::<dyn TagProvider>() {
            for tag in source.tags() {
                let Some(sprite) = self.status.tag(tag) else {
                    continue;
                };
                self.sprites.draw_sprite(sprite, origin + offset, 0);
                offset.y += TAG_ADVANCE;
            }
        }
    }

    /// Red segments from the actor's cell through every remaining step of
    /// its [`PathProvider`] path, joining cell centers.
    pub fn draw_path(&mut self, actor: &Actor) {
        let Some(mobile) = actor.capabilities().get::<dyn PathProvider>() else {
            return;
        };
        let cell_size = self.rules.general.cell_size;
        let mut start = actor.location;

        for step in mobile.current_path() {
            self.line(start.center(cell_size), step.center(cell_size), Color::RED);
            start = step;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_world::geometry::Cell;
    use skirmish_world::sprite::{Sprite, SpriteId};
    use skirmish_world::status::{Pip, Tag};

    use crate::animation::SpriteSheet;
    use crate::sink::{LineBatch, QueuedLine, QueuedSprite, SpriteBatch};

    #[derive(Default)]
    struct Sprites(SpriteBatch);

    impl SpriteSink for Sprites {
        fn draw_sprite(&mut self, sprite: Sprite, position: Float2, palette: usize) {
            self.0.push(sprite, position, palette);
        }
        fn flush(&mut self) {}
    }

    #[derive(Default)]
    struct Lines(LineBatch);

    impl LineSink for Lines {
        fn draw_line(&mut self, a: Float2, b: Float2, color_a: Color, color_b: Color) {
            self.0.push(a, b, color_a, color_b);
        }
        fn flush(&mut self) {}
    }

    struct Fixture {
        sprites: Sprites,
        lines: Lines,
        rules: Rules,
        status: StatusSprites,
    }

    impl Fixture {
        fn new() -> Self {
            let rules = Rules::default();
            let sheet = SpriteSheet::standard_pips(SpriteId(100));
            let status = StatusSprites::resolve(&sheet, &rules).unwrap();
            Self {
                sprites: Sprites::default(),
                lines: Lines::default(),
                rules,
                status,
            }
        }

        fn overlay(&mut self, show_unit_paths: bool) -> Overlay<'_> {
            Overlay::new(
                &mut self.sprites,
                &mut self.lines,
                &self.rules,
                &self.status,
                PlayerId(1),
                &RenderConfig { show_unit_paths },
            )
        }

        fn lines(&mut self) -> Vec<QueuedLine> {
            self.lines.0.take()
        }

        fn sprites(&mut self) -> Vec<QueuedSprite> {
            self.sprites.0.take()
        }
    }

    struct Hold(Vec<Pip>);
    impl PipProvider for Hold {
        fn pips(&self) -> Vec<Pip> {
            self.0.clone()
        }
    }

    struct Marks(Vec<Tag>);
    impl TagProvider for Marks {
        fn tags(&self) -> Vec<Tag> {
            self.0.clone()
        }
    }

    struct Route(Vec<Cell>);
    impl PathProvider for Route {
        fn current_path(&self) -> Vec<Cell> {
            self.0.clone()
        }
    }

    fn tank() -> Actor {
        Actor::new(Float2::new(50.0, 50.0), Float2::new(20.0, 20.0))
            .with_health(100, 100)
            .with_owner(PlayerId(1))
    }

    #[test]
    fn health_fraction_guards_zero_strength() {
        let actor = tank().with_health(0, 0);
        assert_eq!(health_fraction(&actor), 1.0);
        assert_eq!(health_fraction(&tank().with_health(30, 100)), 0.3);
    }

    #[test]
    fn health_color_boundaries() {
        let rules = GeneralRules::default();
        assert_eq!(health_color(0.0, &rules), Color::RED);
        assert_eq!(health_color(0.24, &rules), Color::RED);
        assert_eq!(health_color(rules.condition_red, &rules), Color::YELLOW);
        assert_eq!(health_color(0.49, &rules), Color::YELLOW);
        assert_eq!(health_color(rules.condition_yellow, &rules), Color::LIME_GREEN);
        assert_eq!(health_color(1.0, &rules), Color::LIME_GREEN);
    }

    #[test]
    fn brackets_are_eight_solid_segments() {
        let mut fx = Fixture::new();
        fx.overlay(false)
            .draw_selection_box(&tank(), Color::YELLOW, false);
        let lines = fx.lines();
        assert_eq!(lines.len(), 8);
        assert!(lines
            .iter()
            .all(|l| l.color_a == Color::YELLOW && l.color_b == Color::YELLOW));
        assert_eq!(lines[0].a, Float2::new(40.0, 40.0));
        assert_eq!(lines[0].b, Float2::new(44.0, 40.0));
        assert_eq!(lines[7].a, Float2::new(60.0, 60.0));
        assert_eq!(lines[7].b, Float2::new(60.0, 56.0));
    }

    #[test]
    fn health_bar_geometry_at_red_threshold() {
        let mut fx = Fixture::new();
        let actor = tank().with_health(25, 100);
        fx.overlay(false).draw_health_bar(
            &actor,
            Float2::new(40.0, 40.0),
            Float2::new(60.0, 40.0),
        );
        let lines = fx.lines();
        assert_eq!(lines.len(), 7);

        // End ticks.
        assert_eq!(lines[0].a, Float2::new(40.0, 38.0));
        assert_eq!(lines[0].b, Float2::new(40.0, 36.0));
        assert_eq!(lines[1].a, Float2::new(60.0, 38.0));

        // Missing health runs from z = 45 to the right corner.
        assert_eq!(lines[2].a, Float2::new(45.0, 36.0));
        assert_eq!(lines[2].b, Float2::new(60.0, 36.0));
        assert_eq!(lines[3].a, Float2::new(45.0, 38.0));
        for line in &lines[..4] {
            assert_eq!(line.color_a, Color::GRAY);
        }

        // Exactly at condition_red is yellow.
        assert_eq!(lines[4].a, Float2::new(40.0, 37.0));
        assert_eq!(lines[4].b, Float2::new(45.0, 37.0));
        assert_eq!(lines[4].color_a, Color::YELLOW);
        assert_eq!(lines[5].color_a, Color::YELLOW.halved());
        assert_eq!(lines[6].color_b, Color::YELLOW.halved());
        assert_eq!(lines[6].a, Float2::new(40.0, 36.0));
    }

    #[test]
    fn status_bar_for_owner_draws_pips_and_tags() {
        let mut fx = Fixture::new();
        let actor = tank()
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Green, Pip::Red])))
            .with_capability::<dyn TagProvider>(Box::new(Marks(vec![Tag::Primary])));
        fx.overlay(false)
            .draw_selection_box(&actor, Color::WHITE, true);

        assert_eq!(fx.lines().len(), 8 + 7);
        let sprites = fx.sprites();
        let ids: Vec<SpriteId> = sprites.iter().map(|s| s.sprite.id).collect();
        assert_eq!(ids, vec![SpriteId(101), SpriteId(103), SpriteId(106)]);

        // First pip at bottom-left (40, 60) + (-12, -7).
        assert_eq!(sprites[0].position, Float2::new(28.0, 53.0));
        assert_eq!(sprites[1].position, Float2::new(32.0, 53.0));
        // Tag at top-center (50, 40) + (-16, 2).
        assert_eq!(sprites[2].position, Float2::new(34.0, 42.0));
    }

    #[test]
    fn opponents_see_health_but_not_pips_or_tags() {
        let mut fx = Fixture::new();
        let actor = tank()
            .with_owner(PlayerId(2))
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Green])))
            .with_capability::<dyn TagProvider>(Box::new(Marks(vec![Tag::Fake])));
        fx.overlay(false)
            .draw_selection_box(&actor, Color::WHITE, true);

        assert_eq!(fx.lines().len(), 8 + 7);
        assert!(fx.sprites().is_empty());
    }

    #[test]
    fn pips_wrap_when_next_would_overflow_width() {
        let mut fx = Fixture::new();
        let actor = Actor::new(Float2::new(50.0, 50.0), Float2::new(24.0, 24.0))
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Gray; 8])));
        fx.overlay(false).draw_pips(&actor, Float2::ZERO);

        let ys: Vec<f32> = fx.sprites().iter().map(|s| s.position.y - PIP_ORIGIN.y).collect();
        assert_eq!(ys.len(), 8);
        assert!(ys[..6].iter().all(|&y| y == 0.0));
        assert_eq!(ys[6] - ys[5], -PIP_WRAP_STEP);
        assert_eq!(ys[7], ys[6]);
    }

    #[test]
    fn each_pip_source_starts_a_new_row() {
        let mut fx = Fixture::new();
        let actor = Actor::new(Float2::ZERO, Float2::new(24.0, 24.0))
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Green])))
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Yellow, Pip::Yellow])));
        fx.overlay(false).draw_pips(&actor, Float2::ZERO);

        let offsets: Vec<Float2> = fx
            .sprites()
            .iter()
            .map(|s| s.position - PIP_ORIGIN)
            .collect();
        assert_eq!(
            offsets,
            vec![
                Float2::new(0.0, 0.0),
                Float2::new(0.0, -PIP_ROW_STEP),
                Float2::new(PIP_ADVANCE, -PIP_ROW_STEP),
            ]
        );
    }

    #[test]
    fn zero_width_frame_puts_every_pip_on_its_own_row() {
        let mut fx = Fixture::new();
        let actor = Actor::new(Float2::new(50.0, 50.0), Float2::ZERO)
            .with_health(100, 100)
            .with_owner(PlayerId(1))
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Green; 3])))
            .with_capability::<dyn PipProvider>(Box::new(Hold(vec![Pip::Red])));
        fx.overlay(false).draw_pips(&actor, Float2::ZERO);

        let offsets: Vec<Float2> = fx
            .sprites()
            .iter()
            .map(|s| s.position - PIP_ORIGIN)
            .collect();
        let wrap = -PIP_WRAP_STEP;
        assert_eq!(
            offsets,
            vec![
                Float2::new(0.0, 0.0),
                Float2::new(0.0, wrap),
                Float2::new(0.0, 2.0 * wrap),
                Float2::new(0.0, 3.0 * wrap - PIP_ROW_STEP),
            ]
        );

        // The whole selection box still draws at zero size.
        fx.overlay(false)
            .draw_selection_box(&actor, Color::WHITE, true);
        assert_eq!(fx.lines().len(), 8 + 7);
        assert_eq!(fx.sprites().len(), 4);
    }

    #[test]
    fn tags_stack_downward_and_skip_none() {
        let mut fx = Fixture::new();
        let actor = tank()
            .with_capability::<dyn TagProvider>(Box::new(Marks(vec![Tag::Fake, Tag::None])))
            .with_capability::<dyn TagProvider>(Box::new(Marks(vec![Tag::Primary])));
        fx.overlay(false).draw_tags(&actor, Float2::new(16.0, -2.0));

        let sprites = fx.sprites();
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].position, Float2::new(0.0, 0.0));
        assert_eq!(sprites[1].position, Float2::new(0.0, TAG_ADVANCE));
        assert_eq!(sprites[1].sprite.id, SpriteId(106));
    }

    #[test]
    fn path_drawn_only_when_enabled() {
        let route = vec![Cell::new(1, 0), Cell::new(1, 1)];
        let actor = tank()
            .with_location(Cell::new(0, 0))
            .with_capability::<dyn PathProvider>(Box::new(Route(route)));

        let mut fx = Fixture::new();
        fx.overlay(false)
            .draw_selection_box(&actor, Color::WHITE, false);
        assert_eq!(fx.lines().len(), 8);

        fx.overlay(true)
            .draw_selection_box(&actor, Color::WHITE, false);
        let lines = fx.lines();
        assert_eq!(lines.len(), 10);
        let path = &lines[8..];
        assert_eq!(path[0].a, Float2::new(12.0, 12.0));
        assert_eq!(path[0].b, Float2::new(36.0, 12.0));
        assert_eq!(path[1].a, Float2::new(36.0, 12.0));
        assert_eq!(path[1].b, Float2::new(36.0, 36.0));
        assert!(path.iter().all(|l| l.color_a == Color::RED && l.color_b == Color::RED));
    }

    #[test]
    fn drag_box_draws_four_edges() {
        let mut fx = Fixture::new();
        let sel = SelectionBox::new(Float2::new(10.0, 10.0), Float2::new(30.0, 20.0));
        fx.overlay(false).draw_drag_box(&sel, Color::WHITE);
        let lines = fx.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].b, Float2::new(30.0, 10.0));
        assert_eq!(lines[1].b, Float2::new(30.0, 20.0));
        assert_eq!(lines[2].b, Float2::new(10.0, 20.0));
        assert_eq!(lines[3].b, Float2::new(10.0, 20.0));
    }
}
