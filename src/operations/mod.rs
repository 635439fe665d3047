mod joint;
mod neighbors;
mod opening;
mod rebuild;
mod room_finder;

pub use joint::{JointPoints, WallJointResolver};
pub use neighbors::{FindNeighbors, WallNeighbors};
pub use opening::{OpeningProjector, ProjectedOpening};
pub use rebuild::{FloorPlanMeshes, Rebuild, RoomMeshes, WallMeshes};
pub use room_finder::FindRooms;
