//! Skirmish World -- the read-only world model consumed by the renderer.
//!
//! This crate holds everything the renderer reads each frame: actors with
//! generational ids, the per-actor capability registry, transient effects,
//! the geometry primitives shared by both sides, and the game rules that
//! parameterize overlays (condition thresholds, cell size, pip/tag frame
//! names).
//!
//! The simulation owns and mutates the [`World`](world::World); the renderer
//! only borrows it for the duration of a frame.
//!
//! # Quick Start
//!
//! ```
//! use skirmish_world::prelude::*;
//!
//! struct Cargo(Vec<Pip>);
//!
//! impl PipProvider for Cargo {
//!     fn pips(&self) -> Vec<Pip> {
//!         self.0.clone()
//!     }
//! }
//!
//! let mut world = World::new();
//! let truck = world.spawn(
//!     Actor::new(Float2::new(48.0, 48.0), Float2::new(24.0, 24.0))
//!         .with_health(80, 100)
//!         .with_capability::<dyn PipProvider>(Box::new(Cargo(vec![Pip::Green, Pip::Empty]))),
//! );
//!
//! let actor = world.get(truck).unwrap();
//! assert!(actor.capabilities().has::<dyn PipProvider>());
//! assert!(!actor.capabilities().has::<dyn TagProvider>());
//! ```

#![deny(unsafe_code)]

pub mod actor;
pub mod capability;
pub mod effect;
pub mod geometry;
pub mod rules;
pub mod sprite;
pub mod status;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building or configuring the world model.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The actor does not exist (stale generation or never spawned).
    #[error("actor {actor} does not exist (stale or never spawned)")]
    StaleActor {
        actor: actor::ActorId,
    },

    /// The rules document could not be parsed.
    #[error("failed to parse rules: {0}")]
    RulesParse(#[from] serde_json::Error),

    /// The rules parsed but violate a value constraint.
    #[error("invalid rules: {details}")]
    InvalidRules {
        details: String,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::actor::{Actor, ActorId, PlayerId};
    pub use crate::capability::{
        Capabilities, ImageSource, PathProvider, PipProvider, RoofRenderer, TagProvider,
    };
    pub use crate::effect::{Effect, StaticEffect};
    pub use crate::geometry::{Cell, Float2, Rect};
    pub use crate::rules::{GeneralRules, PipFrames, Rules, TagFrames};
    pub use crate::sprite::{Renderable, Sprite, SpriteId};
    pub use crate::status::{Pip, Tag};
    pub use crate::world::{SelectionBox, World};
    pub use crate::WorldError;
}
