//! Scene builders shared by the physics benchmarks.

use anyhow::Result;
use convex_toi::mesh::MeshData;
use convex_toi::physics::body::RigidBody;
use convex_toi::physics::hitbox::Hitbox;
use convex_toi::physics::transform::Transform;
use convex_toi::physics::{PhysicsConfig, PhysicsWorld};
use glam::Vec3;

/// Two unit cubes `offset` apart, `a` at the origin.
pub fn cube_pair(offset: Vec3) -> (RigidBody, RigidBody) {
    let a = RigidBody::new_dynamic(Transform::identity());
    let b = RigidBody::new_dynamic(Transform::from_position(offset));
    (a, b)
}

/// Two cubes moving head-on along X that collide within one step of `dt`.
pub fn approaching_pair(dt: f32) -> (RigidBody, RigidBody) {
    let speed = 3.0 / dt;
    let a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(-2.5, 0.0, 0.0)))
        .with_velocity(Vec3::new(speed, 0.0, 0.0));
    let b = RigidBody::new_dynamic(Transform::from_position(Vec3::new(2.5, 0.0, 0.0)))
        .with_velocity(Vec3::new(-speed, 0.0, 0.0));
    (a, b)
}

/// A fitted hitbox body built from a procedurally generated convex mesh
/// (a ring of `segments` points at two heights).
pub fn prism_body(segments: usize, transform: Transform) -> Result<RigidBody> {
    let mut source = String::new();
    for y in [-1.0f32, 1.0] {
        for i in 0..segments {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            source.push_str(&format!("v {} {} {}\n", angle.cos(), y, angle.sin()));
        }
    }
    let mesh = MeshData::parse(&source)?;
    let mut body = RigidBody::new_dynamic(transform);
    body.hitbox = Hitbox::fitted(&mesh, transform.scale);
    Ok(body)
}

/// `n` falling cubes laid out on a grid above a static floor.
pub fn setup_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = hecs::World::new();
    let side = (n as f32).sqrt().ceil() as usize;

    world.spawn((RigidBody::new_static(
        Transform::from_position(Vec3::new(0.0, -1.0, 0.0))
            .with_scale(Vec3::new(side as f32 * 3.0, 0.5, side as f32 * 3.0)),
    ),));

    for i in 0..n {
        let x = (i % side) as f32 * 3.0 - side as f32 * 1.5;
        let z = (i / side) as f32 * 3.0 - side as f32 * 1.5;
        let y = 2.0 + (i % 7) as f32 * 0.5;
        world.spawn((RigidBody::new_dynamic(
            Transform::from_position(Vec3::new(x, y, z)).with_scale(Vec3::splat(0.5)),
        ),));
    }

    (world, PhysicsWorld::new(PhysicsConfig::default()))
}
