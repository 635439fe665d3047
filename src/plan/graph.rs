use slotmap::SlotMap;

use crate::error::PlanError;
use crate::math::Point2;

use super::room::RoomWall;
use super::wall::Wall;

slotmap::new_key_type! {
    /// Unique identifier for a wall in a [`WallGraph`].
    pub struct WallId;
}

/// A wall endpoint shared by one or more walls.
#[derive(Debug, Clone)]
pub struct Node {
    pub point: Point2,
    /// Walls starting or ending here, in insertion order.
    pub walls: Vec<WallId>,
}

/// Arena of walls connected through their endpoints.
///
/// Endpoints closer than the graph tolerance are merged into one node.
/// Walls keep their insertion order for deterministic traversal.
#[derive(Debug)]
pub struct WallGraph {
    walls: SlotMap<WallId, Wall>,
    order: Vec<WallId>,
    nodes: Vec<Node>,
    tolerance: f64,
}

impl WallGraph {
    /// Creates an empty graph that merges endpoints within `tolerance`.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            walls: SlotMap::with_key(),
            order: Vec::new(),
            nodes: Vec::new(),
            tolerance,
        }
    }

    /// Builds a graph from walls, in order.
    #[must_use]
    pub fn from_walls(walls: impl IntoIterator<Item = Wall>, tolerance: f64) -> Self {
        let mut graph = Self::new(tolerance);
        for wall in walls {
            graph.add_wall(wall);
        }
        graph
    }

    /// Inserts a wall and registers it at both of its endpoints.
    pub fn add_wall(&mut self, wall: Wall) -> WallId {
        let start = wall.start();
        let end = wall.end();
        let id = self.walls.insert(wall);
        self.order.push(id);

        let start_node = self.ensure_node(start);
        self.nodes[start_node].walls.push(id);
        let end_node = self.ensure_node(end);
        if end_node != start_node {
            self.nodes[end_node].walls.push(id);
        }
        id
    }

    /// Returns the wall with the given ID.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::WallNotFound` if the ID is unknown.
    pub fn wall(&self, id: WallId) -> Result<&Wall, PlanError> {
        self.walls.get(id).ok_or(PlanError::WallNotFound)
    }

    /// Wall IDs in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[WallId] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Walls touching `point`, or an empty slice if no node is there.
    #[must_use]
    pub fn walls_at(&self, point: &Point2) -> &[WallId] {
        self.find_node(point)
            .map_or(&[], |i| self.nodes[i].walls.as_slice())
    }

    /// Returns `true` if the two points fall on the same node.
    #[must_use]
    pub fn same_point(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() <= self.tolerance
    }

    /// Orients wall `id` so that it leaves `point` (`leaving = true`) or
    /// arrives there. Walls touching `point` at neither or both ends give
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::WallNotFound` if the ID is unknown.
    pub fn orient(
        &self,
        id: WallId,
        point: &Point2,
        leaving: bool,
    ) -> Result<Option<RoomWall>, PlanError> {
        let wall = self.wall(id)?;
        let starts_here = self.same_point(&wall.start(), point);
        let ends_here = self.same_point(&wall.end(), point);
        Ok(match (starts_here, ends_here) {
            (true, false) => Some(RoomWall::new(id, !leaving)),
            (false, true) => Some(RoomWall::new(id, leaving)),
            _ => None,
        })
    }

    fn find_node(&self, point: &Point2) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| (n.point - point).norm() <= self.tolerance)
    }

    fn ensure_node(&mut self, point: Point2) -> usize {
        if let Some(i) = self.find_node(&point) {
            return i;
        }
        self.nodes.push(Node {
            point,
            walls: Vec::new(),
        });
        self.nodes.len() - 1
    }
}
