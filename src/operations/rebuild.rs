use tracing::info;

use crate::error::Result;
use crate::math::polygon_2d::dedup_closed;
use crate::math::Point2;
use crate::plan::{Room, RoomWall, Side, Wall, WallDef, WallGraph, WallId};
use crate::tessellation::{Mesh, MeshParams, RoomMeshBuilder, WallMeshBuilder};

use super::{FindNeighbors, FindRooms, WallJointResolver};

/// Meshes of one wall, built in the direction it was traversed.
#[derive(Debug, Clone)]
pub struct WallMeshes {
    pub wall: WallId,
    pub reversed: bool,
    pub meshes: Vec<Mesh>,
}

/// Meshes of one room.
#[derive(Debug, Clone)]
pub struct RoomMeshes {
    pub room: Room,
    pub walls: Vec<WallMeshes>,
    /// Present when [`MeshParams::room_meshes`] is set.
    pub floor: Option<Mesh>,
    pub ceiling: Option<Mesh>,
}

/// Everything built from one floor plan.
#[derive(Debug)]
pub struct FloorPlanMeshes {
    /// The walls the IDs below refer to.
    pub graph: WallGraph,
    pub rooms: Vec<RoomMeshes>,
    /// Walls that border no room, built in their stored direction.
    pub loose_walls: Vec<WallMeshes>,
}

impl FloorPlanMeshes {
    /// Total number of meshes.
    #[must_use]
    pub fn mesh_count(&self) -> usize {
        fn count(walls: &[WallMeshes]) -> usize {
            walls.iter().map(|w| w.meshes.len()).sum()
        }
        self.rooms
            .iter()
            .map(|r| {
                count(&r.walls) + usize::from(r.floor.is_some()) + usize::from(r.ceiling.is_some())
            })
            .sum::<usize>()
            + count(&self.loose_walls)
    }
}

/// Rebuilds every mesh of a floor plan from its wall definitions.
///
/// Walls are sampled and validated, rooms are found, and each wall of each
/// room is built against its neighbors in room order. A wall shared by two
/// rooms is built once per room, facing each. Nothing survives between
/// calls.
pub struct Rebuild<'a> {
    walls: &'a [WallDef],
    params: MeshParams,
}

impl<'a> Rebuild<'a> {
    /// Creates a new `Rebuild` operation.
    #[must_use]
    pub fn new(walls: &'a [WallDef], params: MeshParams) -> Self {
        Self { walls, params }
    }

    /// Executes the rebuild.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while validating a wall, finding rooms,
    /// resolving joints, or triangulating a mesh.
    pub fn execute(&self) -> Result<FloorPlanMeshes> {
        let walls = self
            .walls
            .iter()
            .map(|def| def.build(&self.params))
            .collect::<Result<Vec<_>>>()?;
        let graph = WallGraph::from_walls(walls, self.params.tolerance);
        let rooms = FindRooms::new(&graph).execute()?;

        let mut room_meshes = Vec::with_capacity(rooms.len());
        for room in rooms {
            room_meshes.push(self.room(&graph, room)?);
        }

        let mut loose_walls = Vec::new();
        for &id in graph.ids() {
            if room_meshes.iter().any(|r| r.room.contains(id)) {
                continue;
            }
            let (meshes, _) = build_wall(&graph, RoomWall::new(id, false))?;
            loose_walls.push(meshes);
        }

        let out = FloorPlanMeshes {
            graph,
            rooms: room_meshes,
            loose_walls,
        };
        info!(
            rooms = out.rooms.len(),
            walls = out.graph.len(),
            meshes = out.mesh_count(),
            "floor plan rebuilt"
        );
        Ok(out)
    }

    fn room(&self, graph: &WallGraph, room: Room) -> Result<RoomMeshes> {
        let mut walls = Vec::with_capacity(room.len());
        let mut outline: Vec<Point2> = Vec::new();
        let mut height = f64::INFINITY;

        for rw in room.walls() {
            let (meshes, inner) = build_wall(graph, *rw)?;
            walls.push(meshes);
            outline.extend(inner);
            height = height.min(graph.wall(rw.wall)?.height());
        }

        let (floor, ceiling) = if self.params.room_meshes {
            let outline = dedup_closed(&outline, self.params.tolerance);
            let [floor, ceiling] = RoomMeshBuilder::new(&outline, height).execute()?;
            (Some(floor), Some(ceiling))
        } else {
            (None, None)
        };

        Ok(RoomMeshes {
            room,
            walls,
            floor,
            ceiling,
        })
    }
}

/// Builds one wall in the given direction and returns its meshes together
/// with its resolved inner boundary.
fn build_wall(graph: &WallGraph, rw: RoomWall) -> Result<(WallMeshes, Vec<Point2>)> {
    let stored = graph.wall(rw.wall)?;
    let wall: Wall = if rw.reversed {
        stored.reversed()?
    } else {
        stored.clone()
    };
    let neighbors = FindNeighbors::new(graph, rw).execute()?;
    let inner = WallJointResolver::new(&wall, &neighbors)
        .execute()?
        .boundary(&wall, Side::Inner);
    let meshes = WallMeshBuilder::new(&wall, &neighbors).execute()?;
    Ok((
        WallMeshes {
            wall: rw.wall,
            reversed: rw.reversed,
            meshes,
        },
        inner,
    ))
}
