//! The actor and effect collections the renderer reads each frame.
//!
//! Iteration order is spawn order and is stable across frames; the renderer
//! relies on it to break draw-order ties reproducibly. Recycled slots do not
//! change this: a respawned actor goes to the back of the order.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId};
use crate::effect::Effect;
use crate::geometry::{Float2, Rect};
use crate::WorldError;

// ---------------------------------------------------------------------------
// SelectionBox
// ---------------------------------------------------------------------------

/// An in-progress drag selection, corner to corner in world coordinates.
///
/// `first` is where the drag started; `second` follows the cursor, so it may
/// lie above or left of `first`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBox {
    pub first: Float2,
    pub second: Float2,
}

impl SelectionBox {
    pub fn new(first: Float2, second: Float2) -> Self {
        Self { first, second }
    }

    /// The normalized rectangle covered by the drag.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.first, self.second)
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// One storage cell for an actor.
///
/// `generation` advances each time the cell is vacated, which invalidates
/// every id handed out for the previous occupant.
#[derive(Default)]
struct Slot {
    generation: u32,
    actor: Option<Actor>,
}

/// Live actors plus transient effects.
#[derive(Default)]
pub struct World {
    slots: Vec<Slot>,
    /// Vacated slots, reused oldest first.
    vacant: VecDeque<u32>,
    /// Live ids in spawn order.
    order: Vec<ActorId>,
    effects: Vec<Box<dyn Effect>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an actor and return its freshly assigned id.
    pub fn spawn(&mut self, mut actor: Actor) -> ActorId {
        let slot = match self.vacant.pop_front() {
            Some(slot) => slot,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let cell = &mut self.slots[slot as usize];
        let id = ActorId {
            slot,
            generation: cell.generation,
        };
        actor.id = id;
        cell.actor = Some(actor);
        self.order.push(id);
        id
    }

    /// Remove an actor, returning it.
    pub fn despawn(&mut self, id: ActorId) -> Result<Actor, WorldError> {
        let cell = self
            .slots
            .get_mut(id.slot as usize)
            .filter(|cell| cell.generation == id.generation)
            .ok_or(WorldError::StaleActor { actor: id })?;
        let actor = cell.actor.take().ok_or(WorldError::StaleActor { actor: id })?;
        cell.generation = cell.generation.wrapping_add(1);
        self.vacant.push_back(id.slot);
        self.order.retain(|&live| live != id);
        tracing::debug!(actor = %id, live = self.order.len(), "actor despawned");
        Ok(actor)
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.slots
            .get(id.slot as usize)
            .filter(|cell| cell.generation == id.generation)?
            .actor
            .as_ref()
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|cell| cell.generation == id.generation)?
            .actor
            .as_mut()
    }

    /// Live actors in spawn order.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.slots[id.slot as usize].actor.as_ref())
    }

    pub fn actor_count(&self) -> usize {
        self.order.len()
    }

    /// Actors whose selection bounds touch the rectangle spanned by the two
    /// corners, in spawn order.
    pub fn actors_in_box(&self, first: Float2, second: Float2) -> Vec<&Actor> {
        let area = Rect::from_corners(first, second);
        self.actors()
            .filter(|actor| actor.bounds().intersects(&area))
            .collect()
    }

    pub fn add_effect(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> impl Iterator<Item = &dyn Effect> + '_ {
        self.effects.iter().map(|effect| effect.as_ref())
    }

    /// Drop every effect, typically once they have finished playing.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("actors", &self.order.len())
            .field("effects", &self.effects.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_at(x: f32, y: f32) -> Actor {
        Actor::new(Float2::new(x, y), Float2::new(10.0, 10.0))
    }

    #[test]
    fn spawn_assigns_ids_and_get_resolves() {
        let mut world = World::new();
        let a = world.spawn(unit_at(1.0, 2.0));
        let b = world.spawn(unit_at(3.0, 4.0));
        assert_ne!(a, b);
        assert_eq!(world.get(a).unwrap().id(), a);
        assert_eq!(world.get(b).unwrap().center, Float2::new(3.0, 4.0));
        assert_eq!(world.actor_count(), 2);
    }

    #[test]
    fn despawn_makes_id_stale() {
        let mut world = World::new();
        let a = world.spawn(unit_at(1.0, 2.0));
        let removed = world.despawn(a).unwrap();
        assert_eq!(removed.center, Float2::new(1.0, 2.0));
        assert!(world.get(a).is_none());
        assert!(matches!(
            world.despawn(a),
            Err(WorldError::StaleActor { .. })
        ));
    }

    #[test]
    fn respawn_into_recycled_slot_goes_to_back_of_order() {
        let mut world = World::new();
        let a = world.spawn(unit_at(0.0, 0.0));
        let _b = world.spawn(unit_at(1.0, 0.0));
        world.despawn(a).unwrap();
        let c = world.spawn(unit_at(2.0, 0.0));
        assert_eq!(c.slot(), a.slot());
        assert_eq!(c.generation(), a.generation() + 1);
        assert!(world.get(a).is_none(), "old id must stay stale");

        let xs: Vec<f32> = world.actors().map(|actor| actor.center.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn vacated_slots_are_reused_oldest_first() {
        let mut world = World::new();
        let a = world.spawn(unit_at(0.0, 0.0));
        let b = world.spawn(unit_at(1.0, 0.0));
        world.despawn(b).unwrap();
        world.despawn(a).unwrap();
        assert_eq!(world.spawn(unit_at(2.0, 0.0)).slot(), b.slot());
        assert_eq!(world.spawn(unit_at(3.0, 0.0)).slot(), a.slot());
        assert_eq!(world.spawn(unit_at(4.0, 0.0)).slot(), 2);
    }

    #[test]
    fn unknown_slot_is_stale() {
        let mut world = World::new();
        world.spawn(unit_at(0.0, 0.0));
        let stranger = ActorId {
            slot: 9,
            generation: 0,
        };
        assert!(!world.is_alive(stranger));
        assert!(matches!(
            world.despawn(stranger),
            Err(WorldError::StaleActor { .. })
        ));
        assert_eq!(world.actor_count(), 1);
    }

    #[test]
    fn actors_in_box_matches_bounds_in_either_drag_direction() {
        let mut world = World::new();
        world.spawn(unit_at(10.0, 10.0));
        world.spawn(unit_at(100.0, 100.0));
        world.spawn(unit_at(28.0, 10.0)); // bounds start at x = 23

        let hits = world.actors_in_box(Float2::new(25.0, 20.0), Float2::new(0.0, 0.0));
        let xs: Vec<f32> = hits.iter().map(|actor| actor.center.x).collect();
        assert_eq!(xs, vec![10.0, 28.0]);
    }

    #[test]
    fn selection_box_rect_is_normalized() {
        let sel = SelectionBox::new(Float2::new(30.0, 5.0), Float2::new(10.0, 25.0));
        assert_eq!(sel.rect(), Rect::new(10.0, 5.0, 20.0, 20.0));
    }
}
