//! Per-actor capability registry.
//!
//! A capability is an optional behavioral facet of an actor ("provides pips",
//! "renders a roof layer", ...). Capabilities are stored as trait objects and
//! keyed by the `TypeId` of the trait object type, so the renderer queries
//! them by interface:
//!
//! ```
//! use skirmish_world::prelude::*;
//!
//! struct Veteran;
//! impl TagProvider for Veteran {
//!     fn tags(&self) -> Vec<Tag> {
//!         vec![Tag::Primary]
//!     }
//! }
//!
//! let mut caps = Capabilities::new();
//! caps.insert::<dyn TagProvider>(Box::new(Veteran));
//!
//! assert!(caps.has::<dyn TagProvider>());
//! assert_eq!(caps.all::<dyn TagProvider>().count(), 1);
//! assert!(caps.get::<dyn PipProvider>().is_none());
//! ```
//!
//! One type tag may hold several instances (an actor with two cargo holds
//! carries two pip providers); they are returned in insertion order.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::actor::Actor;
use crate::geometry::Cell;
use crate::sprite::Renderable;
use crate::status::{Pip, Tag};

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Produces the body images of an actor for the current frame.
pub trait ImageSource: Send + Sync {
    fn images(&self, actor: &Actor) -> Vec<Renderable>;
}

/// Produces an overhanging image layer drawn after every actor body, e.g. the
/// roof of a production structure that units drive under.
pub trait RoofRenderer: Send + Sync {
    fn roof_images(&self, actor: &Actor) -> Vec<Renderable>;
}

/// Produces one row of status pips.
pub trait PipProvider: Send + Sync {
    fn pips(&self) -> Vec<Pip>;
}

/// Produces status tags.
pub trait TagProvider: Send + Sync {
    fn tags(&self) -> Vec<Tag>;
}

/// Exposes the cells an actor still plans to move through, nearest first.
pub trait PathProvider: Send + Sync {
    fn current_path(&self) -> Vec<Cell>;
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Type-erased storage for one capability instance.
///
/// The instance is kept as `Box<C>` inside the `Any` box so that unsized
/// trait object types (`C = dyn PipProvider`) can be recovered by downcast.
type Slot = Box<dyn Any + Send + Sync>;

struct CapabilityList {
    /// `std::any::type_name::<C>()`, for diagnostics only.
    name: &'static str,
    instances: Vec<Slot>,
}

/// Registry mapping capability type tags to their ordered instances.
#[derive(Default)]
pub struct Capabilities {
    by_type: HashMap<TypeId, CapabilityList>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a capability instance under the type tag `C`.
    ///
    /// Call with an explicit trait object type so the instance is registered
    /// under the interface rather than its concrete type:
    /// `caps.insert::<dyn PipProvider>(Box::new(cargo))`.
    pub fn insert<C>(&mut self, capability: Box<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let list = self
            .by_type
            .entry(TypeId::of::<C>())
            .or_insert_with(|| CapabilityList {
                name: std::any::type_name::<C>(),
                instances: Vec::new(),
            });
        list.instances.push(Box::new(capability));
    }

    /// Whether at least one instance of `C` is attached.
    pub fn has<C: ?Sized + 'static>(&self) -> bool {
        self.by_type
            .get(&TypeId::of::<C>())
            .is_some_and(|list| !list.instances.is_empty())
    }

    /// The first attached instance of `C`, if any.
    pub fn get<C: ?Sized + 'static>(&self) -> Option<&C> {
        self.all::<C>().next()
    }

    /// Every attached instance of `C`, in insertion order.
    pub fn all<C: ?Sized + 'static>(&self) -> impl Iterator<Item = &C> + '_ {
        self.by_type
            .get(&TypeId::of::<C>())
            .into_iter()
            .flat_map(|list| list.instances.iter())
            .filter_map(|slot| (**slot).downcast_ref::<Box<C>>())
            .map(|boxed| &**boxed)
    }

    /// Number of attached instances of `C`.
    pub fn count<C: ?Sized + 'static>(&self) -> usize {
        self.by_type
            .get(&TypeId::of::<C>())
            .map_or(0, |list| list.instances.len())
    }

    /// Total number of attached instances across all type tags.
    pub fn len(&self) -> usize {
        self.by_type.values().map(|list| list.instances.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type names of every attached capability kind, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.by_type.values().map(|list| list.name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<(&str, usize)> = self
            .by_type
            .values()
            .map(|list| (list.name, list.instances.len()))
            .collect();
        kinds.sort_unstable();
        f.debug_map().entries(kinds).finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Hold(Vec<Pip>);

    impl PipProvider for Hold {
        fn pips(&self) -> Vec<Pip> {
            self.0.clone()
        }
    }

    struct Route(Vec<Cell>);

    impl PathProvider for Route {
        fn current_path(&self) -> Vec<Cell> {
            self.0.clone()
        }
    }

    #[test]
    fn empty_registry_has_nothing() {
        let caps = Capabilities::new();
        assert!(caps.is_empty());
        assert!(!caps.has::<dyn PipProvider>());
        assert!(caps.get::<dyn PipProvider>().is_none());
        assert_eq!(caps.all::<dyn PipProvider>().count(), 0);
    }

    #[test]
    fn multiple_instances_keep_insertion_order() {
        let mut caps = Capabilities::new();
        caps.insert::<dyn PipProvider>(Box::new(Hold(vec![Pip::Green])));
        caps.insert::<dyn PipProvider>(Box::new(Hold(vec![Pip::Red, Pip::Red])));

        let rows: Vec<Vec<Pip>> = caps.all::<dyn PipProvider>().map(|p| p.pips()).collect();
        assert_eq!(rows, vec![vec![Pip::Green], vec![Pip::Red, Pip::Red]]);
        assert_eq!(caps.count::<dyn PipProvider>(), 2);
        assert_eq!(caps.get::<dyn PipProvider>().unwrap().pips(), vec![Pip::Green]);
    }

    #[test]
    fn type_tags_are_independent() {
        let mut caps = Capabilities::new();
        caps.insert::<dyn PipProvider>(Box::new(Hold(vec![])));
        caps.insert::<dyn PathProvider>(Box::new(Route(vec![Cell::new(1, 1)])));

        assert_eq!(caps.len(), 2);
        assert!(caps.has::<dyn PathProvider>());
        assert!(!caps.has::<dyn TagProvider>());
        assert_eq!(
            caps.get::<dyn PathProvider>().unwrap().current_path(),
            vec![Cell::new(1, 1)]
        );
    }

    #[test]
    fn concrete_types_are_their_own_tag() {
        let mut caps = Capabilities::new();
        caps.insert(Box::new(Hold(vec![Pip::Gray])));

        assert!(caps.has::<Hold>());
        assert!(!caps.has::<dyn PipProvider>());
    }

    #[test]
    fn names_and_debug_list_kinds() {
        let mut caps = Capabilities::new();
        caps.insert::<dyn PipProvider>(Box::new(Hold(vec![])));
        let names = caps.names();
        assert_eq!(names.len(), 1);
        assert!(names[0].contains("PipProvider"));
        assert!(format!("{caps:?}").contains("PipProvider"));
    }
}
