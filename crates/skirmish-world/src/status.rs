//! Pip and tag status markers shown next to a selected actor.
//!
//! The ordinal of each variant is load-bearing: frame-name tables in
//! [`rules`](crate::rules) expose an ordinal-ordered view that must stay
//! index-aligned with these enums.

use serde::{Deserialize, Serialize};

/// A small status indicator, e.g. one cargo slot or one unit of ammo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pip {
    Empty = 0,
    Green = 1,
    Yellow = 2,
    Red = 3,
    Gray = 4,
}

impl Pip {
    pub const COUNT: usize = 5;

    /// Every variant in ordinal order.
    pub const ALL: [Pip; Pip::COUNT] = [Pip::Empty, Pip::Green, Pip::Yellow, Pip::Red, Pip::Gray];

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// A marker describing a special state of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    None = 0,
    Fake = 1,
    Primary = 2,
}

impl Tag {
    pub const COUNT: usize = 3;

    /// Every variant in ordinal order.
    pub const ALL: [Tag; Tag::COUNT] = [Tag::None, Tag::Fake, Tag::Primary];

    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }
}
