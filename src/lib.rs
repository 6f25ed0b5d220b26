//! Convex TOI
//!
//! Convex-polytope collision detection and continuous collision resolution
//! for rigid bodies.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **mesh** - Mesh description loading (vertices, faces, bounds)
//! 2. **physics::transform** - Position, Euler rotation, scale
//! 3. **physics::hitbox** - Convex hitbox geometry and velocities
//! 4. **physics::body** - Rigid bodies owning a transform and hitbox
//! 5. **physics::narrowphase** - GJK intersection test
//! 6. **physics::toi** - Time-of-impact bisection resolver
//! 7. **physics** - Fixed-timestep world driver over a hecs `World`

pub mod mesh;
pub mod physics;

// Re-export commonly used types
pub use mesh::{MeshData, MeshError};

pub use physics::body::RigidBody;
pub use physics::contact::Collision;
pub use physics::hitbox::{Hitbox, HitboxType, PhysicsAabb};
pub use physics::narrowphase::{gjk_intersection, Simplex, SupportPoint};
pub use physics::toi::{rotational_bisection, translational_bisection, uncollide_objects};
pub use physics::transform::Transform;
pub use physics::{PhysicsConfig, PhysicsWorld};

// Re-export glam for convenience
pub use glam;
pub use hecs;
