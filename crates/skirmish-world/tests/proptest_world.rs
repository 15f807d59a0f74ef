//! Property tests for the world's actor bookkeeping.
//!
//! Random sequences of spawns and despawns are applied to a [`World`] and to
//! a plain `Vec` model; after every step the world must agree with the model
//! on which actors are alive and on their iteration order.

use proptest::prelude::*;
use skirmish_world::prelude::*;

#[derive(Debug, Clone)]
enum WorldOp {
    Spawn(f32),
    Despawn(usize),
    DespawnStale(usize),
}

fn world_op_strategy() -> impl Strategy<Value = WorldOp> {
    prop_oneof![
        3 => (-500.0f32..500.0).prop_map(WorldOp::Spawn),
        2 => (0..32usize).prop_map(WorldOp::Despawn),
        1 => (0..32usize).prop_map(WorldOp::DespawnStale),
    ]
}

fn actor_at(y: f32) -> Actor {
    Actor::new(Float2::new(0.0, y), Float2::new(8.0, 8.0))
}

proptest! {
    #[test]
    fn world_matches_model(ops in prop::collection::vec(world_op_strategy(), 1..80)) {
        let mut world = World::new();
        // Live (id, y) in spawn order.
        let mut model: Vec<(ActorId, f32)> = Vec::new();
        let mut dead: Vec<ActorId> = Vec::new();

        for op in ops {
            match op {
                WorldOp::Spawn(y) => {
                    let id = world.spawn(actor_at(y));
                    prop_assert!(!model.iter().any(|(live, _)| *live == id));
                    model.push((id, y));
                }
                WorldOp::Despawn(i) => {
                    if model.is_empty() {
                        continue;
                    }
                    let (id, y) = model.remove(i % model.len());
                    let actor = world.despawn(id).unwrap();
                    prop_assert_eq!(actor.center.y, y);
                    prop_assert_eq!(actor.id(), id);
                    dead.push(id);
                }
                WorldOp::DespawnStale(i) => {
                    if dead.is_empty() {
                        continue;
                    }
                    let id = dead[i % dead.len()];
                    let is_stale = matches!(world.despawn(id), Err(WorldError::StaleActor { .. }));
                    prop_assert!(is_stale);
                }
            }

            prop_assert_eq!(world.actor_count(), model.len());
            let ids: Vec<ActorId> = world.actors().map(Actor::id).collect();
            let expected: Vec<ActorId> = model.iter().map(|(id, _)| *id).collect();
            prop_assert_eq!(ids, expected);
            for id in &dead {
                prop_assert!(world.get(*id).is_none());
            }
        }
    }

    #[test]
    fn actors_in_box_is_order_independent(
        centers in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0), 0..30),
        a in (0.0f32..200.0, 0.0f32..200.0),
        b in (0.0f32..200.0, 0.0f32..200.0),
    ) {
        let mut world = World::new();
        for (x, y) in &centers {
            world.spawn(Actor::new(Float2::new(*x, *y), Float2::new(10.0, 10.0)));
        }
        let first = Float2::new(a.0, a.1);
        let second = Float2::new(b.0, b.1);

        let ids_in = |from: Float2, to: Float2| -> Vec<ActorId> {
            world.actors_in_box(from, to).iter().map(|a| a.id()).collect()
        };
        let forward = ids_in(first, second);
        let backward = ids_in(second, first);
        prop_assert_eq!(&forward, &backward);

        let area = Rect::from_corners(first, second);
        for actor in world.actors() {
            let inside = forward.contains(&actor.id());
            prop_assert_eq!(inside, actor.bounds().intersects(&area));
        }
    }
}

#[test]
fn recycled_slot_keeps_old_id_dead() {
    let mut world = World::new();
    let first = world.spawn(actor_at(1.0));
    world.despawn(first).unwrap();
    let second = world.spawn(actor_at(2.0));

    assert_eq!(first.slot(), second.slot());
    assert_ne!(first, second);
    assert!(world.get(first).is_none());
    assert_eq!(world.get(second).unwrap().center.y, 2.0);
}

#[test]
fn respawned_actor_goes_to_the_back() {
    let mut world = World::new();
    let a = world.spawn(actor_at(1.0));
    let b = world.spawn(actor_at(2.0));
    world.despawn(a).unwrap();
    let c = world.spawn(actor_at(3.0));

    let ids: Vec<ActorId> = world.actors().map(Actor::id).collect();
    assert_eq!(ids, vec![b, c]);
}
