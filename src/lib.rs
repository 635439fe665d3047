pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod plan;
pub mod tessellation;

pub use error::{Result, WallmeshError};
pub use operations::{FloorPlanMeshes, Rebuild};
pub use plan::{Opening, OpeningKind, WallDef, WidthChange};
pub use tessellation::{Mesh, MeshParams};
