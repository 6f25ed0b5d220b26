//! Mesh description loader.
//!
//! Reads the vertex and face records of a plain-text mesh description and
//! ignores everything else (normals, texture coordinates, groups, materials).
//!
//! ```text
//! v 1.0 -1.0 0.5
//! f 1/1/1 2/2/2 3/3/3
//! ```
//!
//! Face references are 1-based and only the first `/`-delimited field is used.

use std::path::{Path, PathBuf};

use glam::Vec3;
use thiserror::Error;

/// Errors produced while reading a mesh description.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: invalid vertex coordinate {token:?}")]
    InvalidCoordinate { line: usize, token: String },
    #[error("line {line}: vertex needs 3 coordinates, found {found}")]
    MissingCoordinates { line: usize, found: usize },
    #[error("line {line}: invalid face reference {token:?}")]
    InvalidFaceReference { line: usize, token: String },
    #[error("line {line}: face needs at least 3 vertices, found {found}")]
    DegenerateFace { line: usize, found: usize },
    #[error("face {face} references vertex {index} but the mesh has {count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        count: usize,
    },
    #[error("mesh contains no vertices")]
    Empty,
}

/// Geometry extracted from a mesh description.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    /// Faces as 0-based indices into `vertices`.
    pub faces: Vec<Vec<usize>>,
    /// Per-axis minimum over all vertices.
    pub min: Vec3,
    /// Per-axis maximum over all vertices.
    pub max: Vec3,
}

impl MeshData {
    /// Read and parse a mesh description file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// Parse a mesh description from text.
    pub fn parse(source: &str) -> Result<Self, MeshError> {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for (number, line) in source.lines().enumerate() {
            let line_no = number + 1;
            if let Some(rest) = line.strip_prefix("v ") {
                let vertex = parse_vertex(rest, line_no)?;
                min = min.min(vertex);
                max = max.max(vertex);
                vertices.push(vertex);
            } else if let Some(rest) = line.strip_prefix("f ") {
                faces.push(parse_face(rest, line_no)?);
            }
        }

        if vertices.is_empty() {
            return Err(MeshError::Empty);
        }

        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face,
                    index: index + 1,
                    count: vertices.len(),
                });
            }
        }

        Ok(Self {
            vertices,
            faces,
            min,
            max,
        })
    }

    /// Per-axis size of the mesh (`max - min`).
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// The 8 corners of the axis-aligned bounding box, z-major then y then x.
    pub fn bounding_corners(&self) -> Vec<Vec3> {
        let (min, max) = (self.min, self.max);
        let mut corners = Vec::with_capacity(8);
        for z in [min.z, max.z] {
            for y in [min.y, max.y] {
                for x in [min.x, max.x] {
                    corners.push(Vec3::new(x, y, z));
                }
            }
        }
        corners
    }
}

fn parse_vertex(rest: &str, line: usize) -> Result<Vec3, MeshError> {
    let mut coords = [0.0f32; 3];
    let mut found = 0;
    for token in rest.split_whitespace().take(3) {
        coords[found] = token
            .parse()
            .map_err(|_| MeshError::InvalidCoordinate {
                line,
                token: token.to_string(),
            })?;
        found += 1;
    }
    if found < 3 {
        return Err(MeshError::MissingCoordinates { line, found });
    }
    Ok(Vec3::from_array(coords))
}

fn parse_face(rest: &str, line: usize) -> Result<Vec<usize>, MeshError> {
    let indices = rest
        .split_whitespace()
        .map(|token| {
            let first = token.split('/').next().unwrap_or_default();
            match first.parse::<usize>() {
                Ok(index) if index >= 1 => Ok(index - 1),
                _ => Err(MeshError::InvalidFaceReference {
                    line,
                    token: token.to_string(),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if indices.len() < 3 {
        return Err(MeshError::DegenerateFace {
            line,
            found: indices.len(),
        });
    }
    Ok(indices)
}
