pub mod graph;
pub mod opening;
pub mod profile;
pub mod room;
pub mod wall;

pub use graph::{Node, WallGraph, WallId};
pub use opening::{Opening, OpeningKind};
pub use profile::{SegmentLines, WallProfile};
pub use room::{Room, RoomWall};
pub use wall::{Wall, WallDef, WallShape, WidthChange, DEFAULT_JAMB_DEPTH};

/// One of the two faces of a wall.
///
/// The inner face is to the right of the centerline direction, which is
/// the room interior when the room is traversed clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Inner,
    Outer,
}

impl Side {
    /// Returns `true` if an opening of `kind` cuts this face.
    #[must_use]
    pub fn is_cut_by(self, kind: OpeningKind) -> bool {
        match self {
            Self::Inner => kind.reaches_inner(),
            Self::Outer => kind.reaches_outer(),
        }
    }

    /// Lowercase name used for mesh names and log fields.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::Outer => "outer",
        }
    }
}
