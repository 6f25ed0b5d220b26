//! Broadphase collision detection using swept AABB overlap tests.

use super::body::RigidBody;
use super::hitbox::PhysicsAabb;

/// Sweep-and-prune broadphase (currently O(n^2) pair-wise AABB test).
pub struct SweepAndPrune;

impl Default for SweepAndPrune {
    fn default() -> Self {
        Self
    }
}

impl SweepAndPrune {
    pub fn new() -> Self {
        Self
    }

    /// Find all pairs of entities whose AABBs, swept over `dt` of their
    /// velocities, overlap.
    ///
    /// Only returns pairs where at least one entity is movable.
    pub fn find_pairs(&self, world: &hecs::World, dt: f32) -> Vec<(hecs::Entity, hecs::Entity)> {
        let mut entries: Vec<(hecs::Entity, PhysicsAabb, bool)> = Vec::new();

        for (entity, body) in world.query::<&RigidBody>().iter() {
            let offset = if body.immovable {
                glam::Vec3::ZERO
            } else {
                body.velocity() * dt
            };
            let aabb = body.world_aabb().swept(offset);
            entries.push((entity, aabb, body.immovable));
        }

        let mut pairs = Vec::new();

        // O(n^2) brute force - sufficient for small numbers of entities
        for i in 0..entries.len() {
            for j in (i + 1)..entries.len() {
                let (entity_a, aabb_a, immovable_a) = &entries[i];
                let (entity_b, aabb_b, immovable_b) = &entries[j];

                if *immovable_a && *immovable_b {
                    continue;
                }

                if aabb_a.overlaps(aabb_b) {
                    pairs.push((*entity_a, *entity_b));
                }
            }
        }

        pairs
    }
}
