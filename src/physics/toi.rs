//! Time-of-impact resolution by bisection over the timestep.
//!
//! When a full step of motion would make two bodies interpenetrate, the
//! resolver searches, one translation axis at a time, for the largest part
//! of the step that keeps them apart and commits only that much motion.
//! Each search is a fixed number of damped bisection iterations, each one a
//! trial move followed by a GJK query and a rollback.
//!
//! Translation and rotation are resolved independently, so a penetration
//! that needs both to be corrected can be under-corrected.

use glam::Vec3;
use tracing::{debug, trace};

use super::body::RigidBody;
use super::narrowphase::gjk_intersection;
use super::transform::Transform;

/// Refinement iterations per bisection.
pub const BISECTION_ITERATIONS: usize = 3;

/// Upper bound factor applied to `mid` after a colliding trial.
const COLLIDING_SHRINK: f32 = 0.8;

/// Lower bound factor applied to `mid` after a separated trial.
const SEPARATED_GROW: f32 = 1.2;

/// Translation axes in resolution order: Y, Z, X.
pub const AXIS_ORDER: [usize; 3] = [1, 2, 0];

/// Whether `body` may move during a trial step: it is movable and its
/// velocity points toward `other`.
pub fn is_moving_forward(body: &RigidBody, other: &RigidBody) -> bool {
    !body.immovable && (other.center() - body.center()).dot(body.velocity()) > 0.0
}

/// Move both bodies to non-colliding positions along their velocities.
///
/// Runs a translational bisection for Y, Z, and X, then a second one for X.
/// Velocities are left as they were on entry.
pub fn uncollide_objects(a: &mut RigidBody, b: &mut RigidBody, dt: f32) {
    for axis in AXIS_ORDER {
        translational_bisection(a, b, dt, axis);
    }
    translational_bisection(a, b, dt, AXIS_ORDER[AXIS_ORDER.len() - 1]);
}

/// Search for the largest safe fraction of `dt` along one axis and commit it.
///
/// Only the `axis` component of each body's velocity is used. Returns the
/// committed time.
pub fn translational_bisection(a: &mut RigidBody, b: &mut RigidBody, dt: f32, axis: usize) -> f32 {
    let velocity_a = a.velocity();
    let velocity_b = b.velocity();

    if !a.immovable {
        a.hitbox.set_velocity(axis_component(velocity_a, axis));
    }
    if !b.immovable {
        b.hitbox.set_velocity(axis_component(velocity_b, axis));
    }

    let best = bisect(a, b, dt, RigidBody::advance_translation);
    debug!("Axis {} resolved at t = {} of {}", axis, best, dt);

    if !a.immovable {
        a.hitbox.set_velocity(velocity_a);
    }
    if !b.immovable {
        b.hitbox.set_velocity(velocity_b);
    }

    best
}

/// Rotation-only counterpart of [`translational_bisection`].
///
/// Advances orientation by the full angular velocity, gated by the same
/// forward-motion test. Not used by [`uncollide_objects`].
pub fn rotational_bisection(a: &mut RigidBody, b: &mut RigidBody, dt: f32) -> f32 {
    let best = bisect(a, b, dt, RigidBody::advance_rotation);
    debug!("Rotation resolved at t = {} of {}", best, dt);
    best
}

/// Damped bisection over `[0, dt]`. Trial moves are rolled back; the final
/// `best` move is kept.
fn bisect(a: &mut RigidBody, b: &mut RigidBody, dt: f32, advance: fn(&mut RigidBody, f32)) -> f32 {
    // Both gates see the entry state; B's is not re-evaluated after A moves.
    let move_a = is_moving_forward(a, b);
    let move_b = is_moving_forward(b, a);
    let origin_a = a.transform;
    let origin_b = b.transform;

    let mut low = 0.0f32;
    let mut high = dt;
    let mut best = low;

    for _ in 0..BISECTION_ITERATIONS {
        let mid = (low + high) / 2.0;

        dual_advance(a, b, move_a, move_b, mid, advance);
        let collided = gjk_intersection(a, b).is_some();
        trace!("Bisection trial t = {}: collided = {}", mid, collided);

        if collided {
            high = mid * COLLIDING_SHRINK;
        } else {
            low = mid * SEPARATED_GROW;
            best = mid;
        }

        restore(a, origin_a);
        restore(b, origin_b);
    }

    dual_advance(a, b, move_a, move_b, best, advance);
    best
}

fn dual_advance(
    a: &mut RigidBody,
    b: &mut RigidBody,
    move_a: bool,
    move_b: bool,
    time: f32,
    advance: fn(&mut RigidBody, f32),
) {
    if move_a {
        advance(a, time);
    }
    if move_b {
        advance(b, time);
    }
}

#[inline]
fn restore(body: &mut RigidBody, transform: Transform) {
    body.transform = transform;
}

#[inline]
fn axis_component(v: Vec3, axis: usize) -> Vec3 {
    let mut out = Vec3::ZERO;
    out[axis] = v[axis];
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;
    const EPS: f32 = 1e-4;

    fn falling_pair() -> (RigidBody, RigidBody) {
        let a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(0.0, 3.5, 0.0)))
            .with_velocity(Vec3::new(0.0, -20.0, 0.0));
        let b = RigidBody::new_static(Transform::identity());
        (a, b)
    }

    fn collides_after(a: &RigidBody, b: &RigidBody, dt: f32) -> bool {
        let (mut a, mut b) = (a.clone(), b.clone());
        a.advance(dt);
        b.advance(dt);
        gjk_intersection(&a, &b).is_some()
    }

    #[test]
    fn test_gate() {
        let a = RigidBody::new_dynamic(Transform::identity()).with_velocity(Vec3::X);
        let ahead = RigidBody::new_dynamic(Transform::from_position(Vec3::new(5.0, 0.0, 0.0)));
        let behind = RigidBody::new_dynamic(Transform::from_position(Vec3::new(-5.0, 0.0, 0.0)));
        let beside = RigidBody::new_dynamic(Transform::from_position(Vec3::new(0.0, 5.0, 0.0)));

        assert!(is_moving_forward(&a, &ahead));
        assert!(!is_moving_forward(&a, &behind));
        assert!(!is_moving_forward(&a, &beside));

        let still = RigidBody::new_dynamic(Transform::identity());
        assert!(!is_moving_forward(&still, &ahead));

        let pinned = RigidBody::new_static(Transform::identity()).with_velocity(Vec3::X);
        assert!(!is_moving_forward(&pinned, &ahead));
    }

    #[test]
    fn test_gates_use_entry_positions() {
        // A passes B's center during the committed move; B still moves
        // because its gate was taken before A advanced.
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(-5.0, 5.0, 0.0)))
            .with_velocity(Vec3::new(100.0, 0.0, 0.0));
        let mut b = RigidBody::new_dynamic(Transform::identity())
            .with_velocity(Vec3::new(-1.0, 0.0, 0.0));

        let best = translational_bisection(&mut a, &mut b, DT, 0);

        // No trial collides: 0.05, 0.08, 0.098
        assert!((best - 0.098).abs() < EPS, "best = {best}");
        assert!((a.center().x - 4.8).abs() < 1e-3, "a.x = {}", a.center().x);
        assert!((b.center().x + 0.098).abs() < 1e-4, "b.x = {}", b.center().x);
    }

    #[test]
    fn test_falling_body_stops_short_of_static_body() {
        let (mut a, mut b) = falling_pair();
        assert!(gjk_intersection(&a, &b).is_none());
        assert!(collides_after(&a, &b, DT));

        let best = translational_bisection(&mut a, &mut b, DT, 1);

        // 0.05 clear, 0.08 collides, 0.062 clear
        assert!((best - 0.062).abs() < EPS, "best = {best}");
        assert!((0.0..=DT).contains(&best));
        assert!((a.center().y - 2.26).abs() < 1e-3, "y = {}", a.center().y);
        assert_eq!(a.velocity(), Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(b.center(), Vec3::ZERO);
        assert!(gjk_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_uncollide_leaves_pair_separated_and_restores_velocity() {
        let (mut a, mut b) = falling_pair();
        a.hitbox.set_angular_velocity(Vec3::new(0.0, 3.0, 0.0));

        uncollide_objects(&mut a, &mut b, DT);

        assert!(gjk_intersection(&a, &b).is_none());
        assert!((a.center() - Vec3::new(0.0, 2.26, 0.0)).length() < 1e-3);
        assert_eq!(a.transform.rotation, Vec3::ZERO);
        assert_eq!(a.velocity(), Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(a.angular_velocity(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_uncollide_head_on() {
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(-3.0, 0.2, 0.1)))
            .with_velocity(Vec3::new(20.0, 0.0, 0.0));
        let mut b = RigidBody::new_dynamic(Transform::from_position(Vec3::new(3.0, 0.0, 0.0)))
            .with_velocity(Vec3::new(-20.0, 0.0, 0.0));
        assert!(collides_after(&a, &b, DT));

        uncollide_objects(&mut a, &mut b, DT);

        // First X pass commits 0.098; the second finds no safe time
        assert!((a.center().x + 1.04).abs() < 1e-3, "a.x = {}", a.center().x);
        assert!((b.center().x - 1.04).abs() < 1e-3, "b.x = {}", b.center().x);
        assert_eq!(a.center().y, 0.2);
        assert_eq!(a.center().z, 0.1);
        assert!(gjk_intersection(&a, &b).is_none());
        assert_eq!(a.velocity(), Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(b.velocity(), Vec3::new(-20.0, 0.0, 0.0));
    }

    #[test]
    fn test_second_x_pass_commits_nothing_when_already_close() {
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(-1.04, 0.2, 0.1)))
            .with_velocity(Vec3::new(20.0, 0.0, 0.0));
        let mut b = RigidBody::new_dynamic(Transform::from_position(Vec3::new(1.04, 0.0, 0.0)))
            .with_velocity(Vec3::new(-20.0, 0.0, 0.0));

        let best = translational_bisection(&mut a, &mut b, DT, 0);
        assert_eq!(best, 0.0);
        assert_eq!(a.center().x, -1.04);
        assert_eq!(b.center().x, 1.04);
    }

    #[test]
    fn test_body_moving_away_is_not_moved() {
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(-3.0, 0.0, 0.0)))
            .with_velocity(Vec3::new(-2.0, 0.0, 0.0));
        let mut b = RigidBody::new_dynamic(Transform::from_position(Vec3::new(3.0, 0.0, 0.0)))
            .with_velocity(Vec3::new(-45.0, 0.0, 0.0));
        assert!(collides_after(&a, &b, DT));

        uncollide_objects(&mut a, &mut b, DT);

        // B alone closes the gap: 0.08 on the first X pass, 0.008 on the second
        assert_eq!(a.center(), Vec3::new(-3.0, 0.0, 0.0));
        assert!((b.center().x + 0.96).abs() < 1e-3, "b.x = {}", b.center().x);
        assert!(gjk_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_immovable_body_untouched() {
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(0.0, 3.5, 0.0)))
            .with_velocity(Vec3::new(0.0, -20.0, 0.0));
        let mut b = RigidBody::new_static(Transform::identity())
            .with_velocity(Vec3::new(0.0, 20.0, 0.0))
            .with_angular_velocity(Vec3::new(1.0, 0.0, 0.0));

        uncollide_objects(&mut b, &mut a, DT);
        rotational_bisection(&mut b, &mut a, DT);

        assert_eq!(b.transform, Transform::identity());
        assert_eq!(b.velocity(), Vec3::new(0.0, 20.0, 0.0));
        assert_eq!(b.angular_velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert!(gjk_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_no_motion_when_nothing_moves() {
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(0.0, 5.0, 0.0)));
        let mut b = RigidBody::new_static(Transform::identity());
        let before = a.transform;

        uncollide_objects(&mut a, &mut b, DT);
        assert_eq!(a.transform, before);
    }

    #[test]
    fn test_rotational_bisection() {
        let mut a = RigidBody::new_dynamic(Transform::from_position(Vec3::new(0.0, 2.3, 0.0)))
            .with_velocity(Vec3::new(0.0, -1.0, 0.0))
            .with_angular_velocity(Vec3::new(0.0, 0.0, 10.0));
        let mut b = RigidBody::new_static(Transform::identity());

        let mut full = a.clone();
        full.advance_rotation(DT);
        assert!(gjk_intersection(&full, &b).is_some());

        let best = rotational_bisection(&mut a, &mut b, DT);

        // 0.05 collides, 0.02 clear, 0.032 clear
        assert!((best - 0.032).abs() < EPS, "best = {best}");
        assert!((a.transform.rotation.z - 0.32).abs() < 1e-3);
        assert_eq!(a.center(), Vec3::new(0.0, 2.3, 0.0));
        assert!(gjk_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_axis_component() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(axis_component(v, 0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(axis_component(v, 1), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(axis_component(v, 2), Vec3::new(0.0, 0.0, 3.0));
    }
}
