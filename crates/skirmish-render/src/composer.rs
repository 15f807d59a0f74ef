//! World scene composition: ordering, culling, and submission.
//!
//! Each frame the composer walks the world in three passes and feeds the
//! sprite sink:
//!
//! 1. Actor bodies, back to front. Actors are stably sorted by ascending
//!    center y, so an actor further down the screen overlaps the ones above
//!    it, and actors on the same row keep their spawn order.
//! 2. Roof layers of actors carrying a [`RoofRenderer`], in spawn order, on
//!    top of every body.
//! 3. Transient effects.
//!
//! Every image goes through the same viewport cull. The composer never
//! flushes; committing the batch is the frame orchestrator's call.

use skirmish_world::actor::Actor;
use skirmish_world::capability::RoofRenderer;
use skirmish_world::geometry::Rect;
use skirmish_world::sprite::Renderable;
use skirmish_world::world::World;

use crate::sink::SpriteSink;

/// How many images one composition pass submitted and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeStats {
    pub submitted: usize,
    pub culled: usize,
}

/// Whether any part of `image` can land inside `rect`.
///
/// The image is anchored at its top-left corner, so it stays visible while
/// its anchor lies within `[left - width, right] x [top - height, bottom]`.
/// Both ends are inclusive.
pub fn is_visible(rect: &Rect, image: &Renderable) -> bool {
    let pos = image.position;
    !(pos.x > rect.right()
        || pos.x < rect.left() - image.sprite.width()
        || pos.y > rect.bottom()
        || pos.y < rect.top() - image.sprite.height())
}

/// Submit every visible image to `sink`, counting what was dropped.
pub fn draw_sprite_list<I>(
    sink: &mut dyn SpriteSink,
    rect: &Rect,
    images: I,
    stats: &mut ComposeStats,
) where
    I: IntoIterator<Item = Renderable>,
{
    for image in images {
        if is_visible(rect, &image) {
            sink.draw_sprite(image.sprite, image.position, image.palette);
            stats.submitted += 1;
        } else {
            stats.culled += 1;
        }
    }
}

/// Live actors in painter's order: ascending center y, ties in spawn order.
pub fn draw_order(world: &World) -> Vec<&Actor> {
    let mut actors: Vec<&Actor> = world.actors().collect();
    // `sort_by` is stable, which keeps equal-y actors in spawn order. Adding
    // 0.0 folds -0.0 into +0.0, so the two count as the same row.
    actors.sort_by(|a, b| (a.center.y + 0.0).total_cmp(&(b.center.y + 0.0)));
    actors
}

/// Run the body, roof, and effect passes for one frame.
pub fn compose(sink: &mut dyn SpriteSink, rect: &Rect, world: &World) -> ComposeStats {
    let mut stats = ComposeStats::default();

    for actor in draw_order(world) {
        draw_sprite_list(sink, rect, actor.render(), &mut stats);
    }

    for actor in world.actors() {
        for roof in actor.capabilities().all::<dyn RoofRenderer>() {
            draw_sprite_list(sink, rect, roof.roof_images(actor), &mut stats);
        }
    }

    for effect in world.effects() {
        draw_sprite_list(sink, rect, effect.render(), &mut stats);
    }

    tracing::trace!(
        submitted = stats.submitted,
        culled = stats.culled,
        "scene composed"
    );
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_world::geometry::Float2;
    use skirmish_world::sprite::{Sprite, SpriteId};

    fn image_at(x: f32, y: f32) -> Renderable {
        Renderable::new(Sprite::new(SpriteId(1), 10.0, 20.0), Float2::new(x, y), 0)
    }

    #[test]
    fn inside_is_visible() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(is_visible(&rect, &image_at(50.0, 50.0)));
    }

    #[test]
    fn anchor_left_of_viewport_but_overlapping_is_visible() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        // Sprite spans x in [-8, 2] and y in [-15, 5].
        assert!(is_visible(&rect, &image_at(-8.0, -15.0)));
    }

    #[test]
    fn cull_bounds_are_inclusive() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(is_visible(&rect, &image_at(-10.0, -20.0)));
        assert!(is_visible(&rect, &image_at(100.0, 100.0)));
    }

    #[test]
    fn fully_outside_is_culled() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(!is_visible(&rect, &image_at(-10.5, 50.0)));
        assert!(!is_visible(&rect, &image_at(100.5, 50.0)));
        assert!(!is_visible(&rect, &image_at(50.0, -20.5)));
        assert!(!is_visible(&rect, &image_at(50.0, 100.5)));
    }

    #[test]
    fn draw_order_is_stable_by_y() {
        let mut world = World::new();
        for (x, y) in [(0.0, 5.0), (1.0, 5.0), (2.0, 3.0), (3.0, 8.0)] {
            world.spawn(Actor::new(Float2::new(x, y), Float2::new(1.0, 1.0)));
        }
        let xs: Vec<f32> = draw_order(&world).iter().map(|a| a.center.x).collect();
        assert_eq!(xs, vec![2.0, 0.0, 1.0, 3.0]);
    }

    #[test]
    fn negative_zero_ties_keep_spawn_order() {
        let mut world = World::new();
        world.spawn(Actor::new(Float2::new(0.0, 0.0), Float2::new(1.0, 1.0)));
        world.spawn(Actor::new(Float2::new(1.0, -0.0), Float2::new(1.0, 1.0)));
        let xs: Vec<f32> = draw_order(&world).iter().map(|a| a.center.x).collect();
        assert_eq!(xs, vec![0.0, 1.0]);
    }
}
