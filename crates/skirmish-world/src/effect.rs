//! Transient world effects: projectiles, explosions, muzzle flashes.

use crate::sprite::Renderable;

/// A short-lived visual that is not an actor.
pub trait Effect: Send + Sync {
    /// Images to draw this frame.
    fn render(&self) -> Vec<Renderable>;
}

/// An effect that draws a fixed list of images, e.g. a decal or a scripted
/// flash whose animation is advanced by the simulation.
#[derive(Debug, Clone, Default)]
pub struct StaticEffect {
    pub images: Vec<Renderable>,
}

impl StaticEffect {
    pub fn new(images: Vec<Renderable>) -> Self {
        Self { images }
    }
}

impl Effect for StaticEffect {
    fn render(&self) -> Vec<Renderable> {
        self.images.clone()
    }
}
