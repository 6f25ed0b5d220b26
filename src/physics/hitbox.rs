//! Convex polytope hitboxes.
//!
//! A [`Hitbox`] stores its geometry in local space and is transformed on
//! demand by the owner's current [`Transform`]. Nothing is cached: every
//! query reflects the latest (possibly trial) position of the owner.

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::info;

use crate::mesh::MeshData;

use super::transform::Transform;

/// Local-space corners of the cube hitbox.
const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
];

/// Triangle topology shared by the cube and rectangular hitboxes.
const CUBE_FACES: [[usize; 3]; 12] = [
    [0, 2, 3],
    [0, 1, 2],
    [1, 7, 2],
    [1, 6, 7],
    [6, 5, 4],
    [4, 7, 6],
    [3, 4, 5],
    [3, 5, 0],
    [3, 7, 4],
    [3, 2, 7],
    [0, 6, 1],
    [0, 5, 6],
];

/// Base extents of the cube hitbox.
const CUBE_DIMENSIONS: Vec3 = Vec3::splat(2.0);

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsAabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl PhysicsAabb {
    /// Test whether two AABBs overlap.
    #[inline]
    pub fn overlaps(&self, other: &PhysicsAabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Grow the box to cover a translation by `offset`.
    #[inline]
    pub fn swept(&self, offset: Vec3) -> PhysicsAabb {
        PhysicsAabb {
            min: self.min.min(self.min + offset),
            max: self.max.max(self.max + offset),
        }
    }
}

/// Hitbox geometry source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitboxType {
    /// Fixed cube spanning `[-1, 1]` on every axis.
    Cube,
    /// Axis-aligned bounding box of a mesh file.
    Rectangle,
    /// Exact vertices and faces of a mesh file.
    Fitted,
}

/// Convex polytope collision shape with its owner's velocity state.
#[derive(Debug, Clone)]
pub struct Hitbox {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<usize>>,
    dimensions: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Hitbox {
    /// Create a hitbox from local-space geometry.
    ///
    /// `dimensions` are the base extents; they are multiplied by the owner's
    /// `scale` once here and never recomputed.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<usize>>, dimensions: Vec3, scale: Vec3) -> Self {
        Self {
            vertices,
            faces,
            dimensions: scale * dimensions,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }

    /// The fixed cube hitbox.
    pub fn cube(scale: Vec3) -> Self {
        Self::new(
            CUBE_VERTICES.to_vec(),
            cube_faces(),
            CUBE_DIMENSIONS,
            scale,
        )
    }

    /// Hitbox with the exact geometry of a mesh.
    pub fn fitted(mesh: &MeshData, scale: Vec3) -> Self {
        Self::new(mesh.vertices.clone(), mesh.faces.clone(), mesh.extents(), scale)
    }

    /// Hitbox replacing a mesh by its axis-aligned bounding box.
    pub fn rectangular(mesh: &MeshData, scale: Vec3) -> Self {
        Self::new(mesh.bounding_corners(), cube_faces(), mesh.extents(), scale)
    }

    /// Build a hitbox of the given type.
    ///
    /// # Panics
    ///
    /// Panics if a file-backed type is requested without a mesh path.
    pub fn from_type(kind: HitboxType, mesh_path: Option<&Path>, scale: Vec3) -> Result<Self> {
        if kind == HitboxType::Cube {
            return Ok(Self::cube(scale));
        }

        let Some(path) = mesh_path else {
            panic!("{kind:?} hitbox needs a mesh file to be created");
        };

        let mesh = MeshData::load(path)
            .with_context(|| format!("Failed to load hitbox mesh from {:?}", path))?;
        info!(
            "Loaded {:?} hitbox mesh {:?}: {} vertices, {} faces",
            kind,
            path,
            mesh.vertices.len(),
            mesh.faces.len()
        );

        Ok(match kind {
            HitboxType::Rectangle => Self::rectangular(&mesh, scale),
            _ => Self::fitted(&mesh, scale),
        })
    }

    /// Local-space vertices.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Faces as index sequences into [`Hitbox::vertices`].
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Owner scale times base extents, as of construction.
    pub fn dimensions(&self) -> Vec3 {
        self.dimensions
    }

    /// Vertices transformed by the owner's current transform.
    pub fn world_vertices(&self, transform: &Transform) -> Vec<Vec3> {
        let model = transform.to_matrix();
        self.vertices
            .iter()
            .map(|v| model.transform_point3(*v))
            .collect()
    }

    /// World-space position of corner `corner` of face `face`.
    pub fn face_vertex(&self, transform: &Transform, face: usize, corner: usize) -> Vec3 {
        let index = self.faces[face][corner];
        transform.to_matrix().transform_point3(self.vertices[index])
    }

    /// Outward normal of a face: `(v1 - v0) x (v_last - v0)`. Not normalized.
    pub fn face_normal(&self, transform: &Transform, face: usize) -> Vec3 {
        let last = self.faces[face].len() - 1;
        let v0 = self.face_vertex(transform, face, 0);
        let v1 = self.face_vertex(transform, face, 1);
        let v_last = self.face_vertex(transform, face, last);
        (v1 - v0).cross(v_last - v0)
    }

    /// Whether a vertex of the face matches `point` to two decimal places.
    pub fn face_contains_point(&self, transform: &Transform, face: usize, point: Vec3) -> bool {
        let model = transform.to_matrix();
        let target = round_hundredths(point);
        self.faces[face]
            .iter()
            .any(|&i| round_hundredths(model.transform_point3(self.vertices[i])) == target)
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: Vec3) {
        self.angular_velocity = angular_velocity;
    }

    /// World-space AABB for broadphase tests.
    pub fn world_aabb(&self, transform: &Transform) -> PhysicsAabb {
        let world = self.world_vertices(transform);
        if world.is_empty() {
            return PhysicsAabb {
                min: transform.position,
                max: transform.position,
            };
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in world {
            min = min.min(p);
            max = max.max(p);
        }
        PhysicsAabb { min, max }
    }
}

fn cube_faces() -> Vec<Vec<usize>> {
    CUBE_FACES.iter().map(|f| f.to_vec()).collect()
}

#[inline]
fn round_hundredths(v: Vec3) -> Vec3 {
    (v * 100.0).round()
}
