use crate::error::Result;
use crate::math::polygon_2d::ccw_angle;
use crate::math::Vector2;
use crate::plan::{RoomWall, Side, Wall, WallGraph};

/// The walls a wall joins at either end, each oriented to continue it:
/// previous walls end at this wall's start, next walls start at its end.
///
/// At a T-junction the inner and outer boundaries can meet different walls.
#[derive(Debug, Clone, Default)]
pub struct WallNeighbors {
    pub prev_inner: Option<Wall>,
    pub prev_outer: Option<Wall>,
    pub next_inner: Option<Wall>,
    pub next_outer: Option<Wall>,
}

impl WallNeighbors {
    /// Uses one wall as the previous neighbor on both sides.
    #[must_use]
    pub fn with_prev(mut self, wall: Wall) -> Self {
        self.prev_outer = Some(wall.clone());
        self.prev_inner = Some(wall);
        self
    }

    /// Uses one wall as the next neighbor on both sides.
    #[must_use]
    pub fn with_next(mut self, wall: Wall) -> Self {
        self.next_outer = Some(wall.clone());
        self.next_inner = Some(wall);
        self
    }

    #[must_use]
    pub fn prev(&self, side: Side) -> Option<&Wall> {
        match side {
            Side::Inner => self.prev_inner.as_ref(),
            Side::Outer => self.prev_outer.as_ref(),
        }
    }

    #[must_use]
    pub fn next(&self, side: Side) -> Option<&Wall> {
        match side {
            Side::Inner => self.next_inner.as_ref(),
            Side::Outer => self.next_outer.as_ref(),
        }
    }
}

/// Selects the neighbors of a wall from the graph.
///
/// Candidates at each end are ordered by the counter-clockwise turn from a
/// reference direction. At the start the reference is the wall's own
/// direction and candidates are measured by the arm they leave the shared
/// point along, so the inner side (clockwise from the wall) is the last
/// candidate. At the end the reference is the reversed wall direction, so
/// the inner side is the first candidate, the same rightmost turn the room
/// search takes.
pub struct FindNeighbors<'a> {
    graph: &'a WallGraph,
    wall: RoomWall,
}

impl<'a> FindNeighbors<'a> {
    /// Creates a new `FindNeighbors` operation for `wall` in the given orientation.
    #[must_use]
    pub fn new(graph: &'a WallGraph, wall: RoomWall) -> Self {
        Self { graph, wall }
    }

    /// Executes the selection.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::WallNotFound` if a wall ID is unknown, or an error
    /// if a neighbor cannot be reversed.
    pub fn execute(&self) -> Result<WallNeighbors> {
        let wall = self.graph.wall(self.wall.wall)?;
        let start = self.wall.start(wall);
        let end = self.wall.end(wall);

        let mut prev: Vec<(f64, RoomWall)> = Vec::new();
        let mut next: Vec<(f64, RoomWall)> = Vec::new();
        let outgoing = self.wall.outgoing(wall);
        let back = -self.wall.incoming(wall);

        for &id in self.graph.walls_at(&start) {
            if id == self.wall.wall {
                continue;
            }
            let other = self.graph.wall(id)?;
            if let Some(oriented) = self.graph.orient(id, &start, false)? {
                let arm = -oriented.incoming(other);
                prev.push((ccw_angle(&outgoing, &arm), oriented));
            }
        }
        for &id in self.graph.walls_at(&end) {
            if id == self.wall.wall {
                continue;
            }
            let other = self.graph.wall(id)?;
            if let Some(oriented) = self.graph.orient(id, &end, true)? {
                let arm: Vector2 = oriented.outgoing(other);
                next.push((ccw_angle(&back, &arm), oriented));
            }
        }
        prev.sort_by(|a, b| a.0.total_cmp(&b.0));
        next.sort_by(|a, b| a.0.total_cmp(&b.0));

        let resolve = |entry: Option<&(f64, RoomWall)>| -> Result<Option<Wall>> {
            entry.map(|(_, rw)| self.oriented_wall(*rw)).transpose()
        };
        Ok(WallNeighbors {
            prev_inner: resolve(prev.last())?,
            prev_outer: resolve(prev.first())?,
            next_inner: resolve(next.first())?,
            next_outer: resolve(next.last())?,
        })
    }

    fn oriented_wall(&self, rw: RoomWall) -> Result<Wall> {
        let wall = self.graph.wall(rw.wall)?;
        if rw.reversed {
            wall.reversed()
        } else {
            Ok(wall.clone())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::Point2;
    use crate::plan::WallDef;
    use crate::tessellation::MeshParams;

    fn wall(x0: f64, y0: f64, x1: f64, y1: f64) -> Wall {
        WallDef::straight(Point2::new(x0, y0), Point2::new(x1, y1), 0.2, 2.5)
            .build(&MeshParams::default())
            .unwrap()
    }

    #[test]
    fn corner_neighbors_are_oriented() {
        let mut graph = WallGraph::new(1e-6);
        let a = graph.add_wall(wall(0.0, 0.0, 0.0, 2.0));
        // Stored backwards: runs from (2, 2) to (0, 2).
        graph.add_wall(wall(2.0, 2.0, 0.0, 2.0));
        // Ends at (0, 0).
        graph.add_wall(wall(2.0, 0.0, 0.0, 0.0));

        let n = FindNeighbors::new(&graph, RoomWall::new(a, false)).execute().unwrap();
        let next = n.next(Side::Inner).unwrap();
        assert_relative_eq!(next.start(), Point2::new(0.0, 2.0));
        assert_relative_eq!(next.end(), Point2::new(2.0, 2.0));
        let prev = n.prev(Side::Inner).unwrap();
        assert_relative_eq!(prev.end(), Point2::new(0.0, 0.0));
        assert_relative_eq!(prev.start(), Point2::new(2.0, 0.0));
        assert_relative_eq!(n.next(Side::Outer).unwrap().end(), Point2::new(2.0, 2.0));
    }

    #[test]
    fn t_junction_splits_inner_and_outer() {
        // Wall heading north ending at a T: one arm turns east, one west.
        let mut graph = WallGraph::new(1e-6);
        let stem = graph.add_wall(wall(0.0, -2.0, 0.0, 0.0));
        graph.add_wall(wall(0.0, 0.0, 2.0, 0.0));
        graph.add_wall(wall(0.0, 0.0, -2.0, 0.0));

        let n = FindNeighbors::new(&graph, RoomWall::new(stem, false)).execute().unwrap();
        // Inner side is east, so the inner boundary turns right.
        assert_relative_eq!(n.next(Side::Inner).unwrap().end(), Point2::new(2.0, 0.0));
        assert_relative_eq!(n.next(Side::Outer).unwrap().end(), Point2::new(-2.0, 0.0));
        assert!(n.prev(Side::Inner).is_none());
    }

    #[test]
    fn reversed_traversal_swaps_ends() {
        let mut graph = WallGraph::new(1e-6);
        let a = graph.add_wall(wall(0.0, 0.0, 0.0, 2.0));
        graph.add_wall(wall(0.0, 2.0, 2.0, 2.0));

        let n = FindNeighbors::new(&graph, RoomWall::new(a, true)).execute().unwrap();
        assert!(n.next_inner.is_none());
        let prev = n.prev(Side::Outer).unwrap();
        assert_relative_eq!(prev.start(), Point2::new(2.0, 2.0));
        assert_relative_eq!(prev.end(), Point2::new(0.0, 2.0));
    }
}
