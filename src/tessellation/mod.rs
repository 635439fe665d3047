mod plane_mesh;
mod room_mesh;
mod triangulate;
mod wall_mesh;

pub use plane_mesh::PlaneMesh;
pub use room_mesh::RoomMeshBuilder;
pub use triangulate::{Triangulate, Triangulation};
pub use wall_mesh::WallMeshBuilder;

use crate::math::{Point3, Vector3, TOLERANCE};
use crate::plan::DEFAULT_JAMB_DEPTH;

/// Parameters controlling mesh generation.
#[derive(Debug, Clone, Copy)]
pub struct MeshParams {
    /// Sample count for curved walls without an explicit quality (at least 2).
    pub bezier_quality: usize,
    /// Niche depth for openings that do not set one.
    pub default_jamb_depth: f64,
    /// Distance under which wall endpoints are treated as the same node.
    pub tolerance: f64,
    /// Whether found rooms also get floor and ceiling meshes.
    pub room_meshes: bool,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            bezier_quality: 50,
            default_jamb_depth: DEFAULT_JAMB_DEPTH,
            tolerance: 1e-6,
            room_meshes: true,
        }
    }
}

/// A named triangle mesh.
///
/// Triangles are counter-clockwise when seen from the side they face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    /// Vertex positions, Z-up.
    pub vertices: Vec<Point3>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Reverses the winding of every triangle.
    pub fn flip_faces(&mut self) {
        for tri in &mut self.indices {
            tri.swap(1, 2);
        }
    }

    /// Builder-style [`Mesh::flip_faces`].
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.flip_faces();
        self
    }

    /// Appends the geometry of `other`, offsetting its indices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]));
    }

    /// Unit normal of triangle `i`, or `None` if it is out of range or
    /// degenerate.
    #[must_use]
    pub fn triangle_normal(&self, i: usize) -> Option<Vector3> {
        let [a, b, c] = self.indices.get(i)?.map(|v| self.vertices[v as usize]);
        let n = (b - a).cross(&(c - a));
        let len = n.norm();
        (len > TOLERANCE).then(|| n / len)
    }

    /// Sum of triangle areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.indices
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|v| self.vertices[v as usize]);
                (b - a).cross(&(c - a)).norm() * 0.5
            })
            .sum()
    }
}
