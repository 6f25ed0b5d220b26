//! Narrowphase collision detection: GJK over polytope hitboxes.
//!
//! The simplex handling is deliberately minimal. The line and triangle cases
//! only produce a new search direction (no Voronoi region pruning) and the
//! tetrahedron case tests its three faces adjacent to the newest point in a
//! fixed order. Results are deterministic for a given vertex order.

use glam::Vec3;
use tracing::trace;

use super::body::RigidBody;

/// Maximum number of support points added after the first.
pub const GJK_MAX_ITERATIONS: usize = 25;

/// Search directions shorter than this mean the origin lies on the simplex.
const DEGENERATE_DIRECTION_EPSILON: f32 = 1e-10;

/// A point of the Minkowski difference with the world points that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportPoint {
    /// `on_a - on_b`.
    pub point: Vec3,
    /// Furthest point of shape A along the search direction.
    pub on_a: Vec3,
    /// Furthest point of shape B against the search direction.
    pub on_b: Vec3,
}

impl SupportPoint {
    pub fn new(on_a: Vec3, on_b: Vec3) -> Self {
        Self {
            point: on_a - on_b,
            on_a,
            on_b,
        }
    }

    /// A support point with no contributing shape points, for hand-built simplices.
    pub fn from_point(point: Vec3) -> Self {
        Self {
            point,
            on_a: point,
            on_b: Vec3::ZERO,
        }
    }
}

/// Ordered set of up to 4 support points (A, B, C, D by insertion order).
#[derive(Debug, Clone)]
pub struct Simplex {
    points: [SupportPoint; 4],
    len: usize,
}

impl Simplex {
    fn new(first: SupportPoint) -> Self {
        Self {
            points: [first; 4],
            len: 1,
        }
    }

    /// Build a simplex from 1 to 4 points.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty or holds more than 4 points.
    pub fn from_points(points: &[SupportPoint]) -> Self {
        assert!(
            (1..=4).contains(&points.len()),
            "simplex needs 1 to 4 points, got {}",
            points.len()
        );
        let mut simplex = Self::new(points[0]);
        for p in &points[1..] {
            simplex.push(*p);
        }
        simplex
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points in insertion order.
    #[inline]
    pub fn points(&self) -> &[SupportPoint] {
        &self.points[..self.len]
    }

    #[inline]
    fn point(&self, index: usize) -> Vec3 {
        self.points[index].point
    }

    fn push(&mut self, point: SupportPoint) {
        assert!(self.len < 4, "simplex overflow");
        self.points[self.len] = point;
        self.len += 1;
    }

    /// Remove the point at `index`, keeping the order of the others.
    fn remove(&mut self, index: usize) {
        assert!(index < self.len, "simplex index {index} out of range");
        self.points.copy_within(index + 1..self.len, index);
        self.len -= 1;
    }
}

/// Outcome of evaluating the simplex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimplexStep {
    /// The simplex encloses the origin.
    ContainsOrigin,
    /// Keep searching along this direction.
    Search(Vec3),
}

/// Furthest world vertex of `body` along `direction`.
///
/// Ties keep the earliest vertex in the hitbox's vertex list.
pub fn furthest(body: &RigidBody, direction: Vec3) -> Vec3 {
    furthest_point(&body.world_vertices(), direction)
}

fn furthest_point(points: &[Vec3], direction: Vec3) -> Vec3 {
    let Some((&first, rest)) = points.split_first() else {
        return Vec3::ZERO;
    };
    let mut best = first;
    let mut best_dot = first.dot(direction);
    for p in rest {
        let d = p.dot(direction);
        if d > best_dot {
            best_dot = d;
            best = *p;
        }
    }
    best
}

/// Minkowski difference support: `furthest(a, d) - furthest(b, -d)`.
pub fn support(a: &RigidBody, b: &RigidBody, direction: Vec3) -> SupportPoint {
    SupportPoint::new(furthest(a, direction), furthest(b, -direction))
}

/// GJK intersection test. Returns `Some(simplex)` if the hitboxes intersect.
pub fn gjk_intersection(a: &RigidBody, b: &RigidBody) -> Option<Simplex> {
    let mut direction = a.center() - b.center();
    let mut simplex = Simplex::new(support(a, b, direction));

    direction = -simplex.point(0);
    if direction.length_squared() < DEGENERATE_DIRECTION_EPSILON {
        // Origin is the first support point
        return Some(simplex);
    }

    for _ in 0..GJK_MAX_ITERATIONS {
        let new_point = support(a, b, direction);
        if new_point.point.dot(direction) < 0.0 {
            return None;
        }
        simplex.push(new_point);

        match evaluate_simplex(&mut simplex) {
            SimplexStep::ContainsOrigin => return Some(simplex),
            SimplexStep::Search(next) => direction = next,
        }

        if direction.length_squared() < DEGENERATE_DIRECTION_EPSILON {
            // Origin lies on the current simplex
            return Some(simplex);
        }
    }

    trace!(
        "GJK exhausted {} iterations without enclosing the origin",
        GJK_MAX_ITERATIONS
    );
    None
}

/// Triple cross product: (a x b) x c
#[inline]
fn triple_cross_product(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    a.cross(b).cross(c)
}

/// Evaluate the simplex and pick the next search direction.
///
/// A tetrahedron that does not enclose the origin loses exactly one point.
///
/// # Panics
///
/// Panics if the simplex does not hold 2, 3, or 4 points.
pub fn evaluate_simplex(simplex: &mut Simplex) -> SimplexStep {
    match simplex.len() {
        2 => simplex_line(simplex),
        3 => simplex_triangle(simplex),
        4 => simplex_tetrahedron(simplex),
        n => unreachable!("simplex has unsupported size {n}"),
    }
}

fn simplex_line(simplex: &Simplex) -> SimplexStep {
    let a = simplex.point(0);
    let ab = simplex.point(1) - a;
    let ao = -a;
    SimplexStep::Search(triple_cross_product(ab, ao, ab))
}

fn simplex_triangle(simplex: &Simplex) -> SimplexStep {
    let a = simplex.point(0);
    let ab = simplex.point(1) - a;
    let ac = simplex.point(2) - a;
    let normal = ac.cross(ab);

    if normal.dot(-a) < 0.0 {
        SimplexStep::Search(-normal)
    } else {
        SimplexStep::Search(normal)
    }
}

fn simplex_tetrahedron(simplex: &mut Simplex) -> SimplexStep {
    let a = simplex.point(0);
    let b = simplex.point(1);
    let c = simplex.point(2);
    let d = simplex.point(3);

    let da = a - d;
    let db = b - d;
    let dc = c - d;
    let d_o = -d;

    let bcd = db.cross(dc);
    if bcd.dot(d_o) >= 0.0 {
        simplex.remove(0);
        return SimplexStep::Search(bcd);
    }

    let cad = dc.cross(da);
    if cad.dot(d_o) >= 0.0 {
        simplex.remove(1);
        return SimplexStep::Search(cad);
    }

    let abd = da.cross(db);
    if abd.dot(d_o) >= 0.0 {
        simplex.remove(2);
        return SimplexStep::Search(abd);
    }

    SimplexStep::ContainsOrigin
}
