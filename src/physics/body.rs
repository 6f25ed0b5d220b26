//! Rigid bodies: transform, hitbox, and delta-time integration.

use std::path::Path;

use anyhow::Result;
use glam::Vec3;

use super::hitbox::{Hitbox, HitboxType, PhysicsAabb};
use super::transform::Transform;

/// A simulated rigid body owning its collision hitbox.
///
/// Linear and angular velocity live on the hitbox; the body advances its
/// transform from them.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub transform: Transform,
    pub hitbox: Hitbox,
    /// Immovable bodies never change position, rotation, or velocity.
    pub immovable: bool,
    /// Whether the world applies gravity to this body.
    pub gravity: bool,
}

impl RigidBody {
    /// Create a movable, gravity-affected body with a cube hitbox.
    pub fn new_dynamic(transform: Transform) -> Self {
        Self {
            hitbox: Hitbox::cube(transform.scale),
            transform,
            immovable: false,
            gravity: true,
        }
    }

    /// Create an immovable body with a cube hitbox and no gravity.
    pub fn new_static(transform: Transform) -> Self {
        Self {
            hitbox: Hitbox::cube(transform.scale),
            transform,
            immovable: true,
            gravity: false,
        }
    }

    /// Create a body whose hitbox is built from a [`HitboxType`].
    ///
    /// # Panics
    ///
    /// Panics if `kind` is file-backed and `mesh_path` is `None`.
    pub fn with_hitbox_type(
        transform: Transform,
        kind: HitboxType,
        mesh_path: Option<&Path>,
        immovable: bool,
    ) -> Result<Self> {
        Ok(Self {
            hitbox: Hitbox::from_type(kind, mesh_path, transform.scale)?,
            transform,
            immovable,
            gravity: !immovable,
        })
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.hitbox.velocity = velocity;
        self
    }

    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.hitbox.angular_velocity = angular_velocity;
        self
    }

    /// Center of the body, used as the hitbox center.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.hitbox.velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> Vec3 {
        self.hitbox.angular_velocity
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Hitbox vertices at the body's current transform.
    pub fn world_vertices(&self) -> Vec<Vec3> {
        self.hitbox.world_vertices(&self.transform)
    }

    pub fn world_aabb(&self) -> PhysicsAabb {
        self.hitbox.world_aabb(&self.transform)
    }

    /// Integrate accelerations into velocities: `v += dt * a`.
    pub fn integrate(&mut self, dt: f32, acceleration: Vec3, angular_acceleration: Vec3) {
        if self.immovable {
            return;
        }
        self.hitbox.velocity += dt * acceleration;
        self.hitbox.angular_velocity += dt * angular_acceleration;
    }

    pub fn integrate_translation(&mut self, dt: f32, acceleration: Vec3) {
        if self.immovable {
            return;
        }
        self.hitbox.velocity += dt * acceleration;
    }

    pub fn integrate_rotation(&mut self, dt: f32, angular_acceleration: Vec3) {
        if self.immovable {
            return;
        }
        self.hitbox.angular_velocity += dt * angular_acceleration;
    }

    /// Advance position and rotation by `dt` of the current velocities.
    pub fn advance(&mut self, dt: f32) {
        self.advance_translation(dt);
        self.advance_rotation(dt);
    }

    pub fn advance_translation(&mut self, dt: f32) {
        if self.immovable {
            return;
        }
        self.transform.position += dt * self.hitbox.velocity;
    }

    pub fn advance_rotation(&mut self, dt: f32) {
        if self.immovable {
            return;
        }
        self.transform.rotation += dt * self.hitbox.angular_velocity;
    }
}
