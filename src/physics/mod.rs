//! CPU-based convex collision detection and time-of-impact resolution.
//!
//! # Architecture
//!
//! The physics pipeline runs in a fixed timestep loop:
//!
//! 1. Apply forces (gravity)
//! 2. Broadphase collision detection (swept AABB overlap)
//! 3. Predict each candidate pair one full step ahead (GJK)
//! 4. Bisect the step for colliding pairs, axis by axis
//! 5. Advance every body that was not resolved

pub mod body;
pub mod broadphase;
pub mod contact;
pub mod hitbox;
pub mod narrowphase;
pub mod toi;
pub mod transform;

use std::collections::{HashMap, HashSet};

use glam::Vec3;
use tracing::debug;

use self::body::RigidBody;
use self::broadphase::SweepAndPrune;
use self::contact::Collision;
use self::narrowphase::gjk_intersection;
use self::toi::uncollide_objects;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.8, 0).
    pub gravity: Vec3,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

/// The main physics world managing simulation state.
///
/// Bodies live as [`RigidBody`] components in a `hecs::World`.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    broadphase: SweepAndPrune,
    collisions: Vec<Collision>,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            accumulator: 0.0,
            broadphase: SweepAndPrune::new(),
            collisions: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Collisions resolved during the most recent fixed step.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Step the physics simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator to ensure deterministic simulation.
    pub fn step(&mut self, world: &mut hecs::World, delta_time: f64) {
        self.accumulator += delta_time;

        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps
        {
            self.fixed_step(world, self.config.fixed_timestep as f32);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > self.config.fixed_timestep * self.config.max_substeps as f64 {
            self.accumulator = 0.0;
        }
    }

    fn fixed_step(&mut self, world: &mut hecs::World, dt: f32) {
        // 1. Apply forces (gravity)
        for (_, body) in world.query_mut::<&mut RigidBody>() {
            if body.gravity {
                body.integrate_translation(dt, self.config.gravity);
            }
        }

        // 2. Broadphase collision detection
        let pairs = self.broadphase.find_pairs(world, dt);

        // 3-4. Predict and resolve
        self.collisions.clear();
        let mut resolved = HashSet::new();
        let mut partners: HashMap<hecs::Entity, Vec<hecs::Entity>> = HashMap::new();
        for (entity_a, entity_b) in pairs {
            let bodies = {
                let body_a = world.get::<&RigidBody>(entity_a);
                let body_b = world.get::<&RigidBody>(entity_b);
                match (body_a, body_b) {
                    (Ok(a), Ok(b)) => Some(((*a).clone(), (*b).clone())),
                    _ => None,
                }
            };
            let Some((mut a, mut b)) = bodies else {
                continue;
            };

            let mut predicted_a = a.clone();
            let mut predicted_b = b.clone();
            predicted_a.advance(dt);
            predicted_b.advance(dt);
            let Some(simplex) = gjk_intersection(&predicted_a, &predicted_b) else {
                continue;
            };

            let (transform_a, transform_b) = (a.transform, b.transform);
            uncollide_objects(&mut a, &mut b, dt);

            // Keep both bodies clear of the partners they were resolved against earlier.
            if reenters_partner(world, &partners, entity_a, &a, entity_b)
                || reenters_partner(world, &partners, entity_b, &b, entity_a)
            {
                debug!(
                    "Resolving {:?} / {:?} would reenter an earlier partner, holding both",
                    entity_a, entity_b
                );
                a.transform = transform_a;
                b.transform = transform_b;
            }
            debug!(
                "Resolved {:?} / {:?}: {:?} -> {:?}, {:?} -> {:?}",
                entity_a,
                entity_b,
                predicted_a.center(),
                a.center(),
                predicted_b.center(),
                b.center()
            );

            if let Ok(mut body) = world.get::<&mut RigidBody>(entity_a) {
                *body = a;
            }
            if let Ok(mut body) = world.get::<&mut RigidBody>(entity_b) {
                *body = b;
            }
            resolved.insert(entity_a);
            resolved.insert(entity_b);
            partners.entry(entity_a).or_default().push(entity_b);
            partners.entry(entity_b).or_default().push(entity_a);
            self.collisions.push(Collision {
                entity_a,
                entity_b,
                simplex,
            });
        }

        // 5. Advance unresolved bodies
        for (entity, body) in world.query_mut::<&mut RigidBody>() {
            if !resolved.contains(&entity) {
                body.advance(dt);
            }
        }
    }
}

/// Whether `body` (the committed state of `entity`) intersects any partner
/// it was already resolved against this step, other than `current`.
fn reenters_partner(
    world: &hecs::World,
    partners: &HashMap<hecs::Entity, Vec<hecs::Entity>>,
    entity: hecs::Entity,
    body: &RigidBody,
    current: hecs::Entity,
) -> bool {
    let Some(earlier) = partners.get(&entity) else {
        return false;
    };
    earlier.iter().filter(|&&other| other != current).any(|&other| {
        world
            .get::<&RigidBody>(other)
            .is_ok_and(|partner| gjk_intersection(body, &partner).is_some())
    })
}
