use crate::error::Result;
use crate::math::{lift, Point2};

use super::{Mesh, Triangulate};

/// Builds the `"floor"` and `"ceiling"` meshes of a room from its plan
/// outline. The floor lies at height 0 facing up, the ceiling at `height`
/// facing down.
pub struct RoomMeshBuilder<'a> {
    outline: &'a [Point2],
    height: f64,
}

impl<'a> RoomMeshBuilder<'a> {
    /// Creates a new `RoomMeshBuilder` operation.
    #[must_use]
    pub fn new(outline: &'a [Point2], height: f64) -> Self {
        Self { outline, height }
    }

    /// Executes the build, returning `[floor, ceiling]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the outline cannot be triangulated.
    pub fn execute(&self) -> Result<[Mesh; 2]> {
        let flat = Triangulate::new(self.outline, &[]).execute()?;
        let floor = Mesh {
            name: "floor".into(),
            vertices: flat.vertices.iter().map(|p| lift(p, 0.0)).collect(),
            indices: flat.indices.clone(),
        };
        let ceiling = Mesh {
            name: "ceiling".into(),
            vertices: flat.vertices.iter().map(|p| lift(p, self.height)).collect(),
            indices: flat.indices,
        }
        .flipped();
        Ok([floor, ceiling])
    }
}
