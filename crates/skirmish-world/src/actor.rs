//! Actors, their ids, and owning players.
//!
//! An [`ActorId`] names a storage slot in the [`World`](crate::world::World)
//! together with the number of times that slot had been vacated when the
//! actor was spawned. Ids held by the UI (selection lists, order targets)
//! therefore go stale on despawn instead of resolving to whatever reuses the
//! slot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{Capabilities, ImageSource};
use crate::geometry::{Cell, Float2, Rect};
use crate::sprite::Renderable;

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// Identity of a participating player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Owner of map decorations and anything not controlled by a player.
    pub const NEUTRAL: PlayerId = PlayerId(0);
}

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// Handle to a spawned actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl ActorId {
    /// Carried by an [`Actor`] until the world assigns it a real id.
    pub(crate) const DETACHED: ActorId = ActorId {
        slot: u32::MAX,
        generation: 0,
    };

    /// Storage slot in the owning world. Slots are reused after despawn.
    pub fn slot(self) -> u32 {
        self.slot
    }

    /// How many earlier occupants the slot had.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.slot, self.generation)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// A live world entity as seen by the renderer.
///
/// Built with [`Actor::new`] and the `with_*` methods, then handed to
/// [`World::spawn`](crate::world::World::spawn), which assigns its id.
#[derive(Debug)]
pub struct Actor {
    pub(crate) id: ActorId,
    /// Center of the actor in world coordinates.
    pub center: Float2,
    /// Width and height of the selection frame.
    pub selected_size: Float2,
    pub health: u32,
    /// Maximum health. Zero means "indestructible" and renders as full.
    pub max_strength: u32,
    pub owner: PlayerId,
    /// Grid cell the actor currently occupies.
    pub location: Cell,
    capabilities: Capabilities,
}

impl Actor {
    pub fn new(center: Float2, selected_size: Float2) -> Self {
        Self {
            id: ActorId::DETACHED,
            center,
            selected_size,
            health: 0,
            max_strength: 0,
            owner: PlayerId::NEUTRAL,
            location: Cell::default(),
            capabilities: Capabilities::new(),
        }
    }

    pub fn with_health(mut self, health: u32, max_strength: u32) -> Self {
        self.health = health;
        self.max_strength = max_strength;
        self
    }

    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_location(mut self, location: Cell) -> Self {
        self.location = location;
        self
    }

    /// Attach a capability under the type tag `C`; see
    /// [`Capabilities::insert`].
    pub fn with_capability<C>(mut self, capability: Box<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities.insert::<C>(capability);
        self
    }

    /// The id assigned at spawn time.
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn capabilities_mut(&mut self) -> &mut Capabilities {
        &mut self.capabilities
    }

    /// Axis-aligned selection bounds around the center.
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.center, self.selected_size)
    }

    /// Body images from every [`ImageSource`] capability, in attach order.
    pub fn render(&self) -> Vec<Renderable> {
        self.capabilities
            .all::<dyn ImageSource>()
            .flat_map(|source| source.images(self))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
