//! Collision records produced by the world step.

use super::narrowphase::Simplex;

/// A predicted collision between two entities that the resolver acted on.
#[derive(Debug, Clone)]
pub struct Collision {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    /// Terminating GJK simplex of the full-step prediction.
    pub simplex: Simplex,
}
