use std::collections::HashSet;

use slotmap::SecondaryMap;
use tracing::{debug, trace};

use crate::error::Result;
use crate::math::polygon_2d::{ccw_angle, dedup_closed, signed_area_2d};
use crate::math::Point2;
use crate::plan::{Room, RoomWall, WallGraph, WallId};

/// A wall borders at most this many rooms, one per side.
const MAX_ROOMS_PER_WALL: u8 = 2;

/// Finds the rooms enclosed by the walls of a graph.
///
/// Each seed wall is walked forward, turning onto the rightmost wall at
/// every node, until the walk returns to the seed. Bounded rooms are
/// traced clockwise; a counter-clockwise loop is the unbounded face around
/// a group of rooms and is rejected, after which the seed is retried in the
/// other direction. Walls ending in a node no other wall touches are marked
/// deadlocked and never considered again.
pub struct FindRooms<'a> {
    graph: &'a WallGraph,
}

/// Mutable bookkeeping shared by every search of one [`FindRooms`] run.
#[derive(Default)]
struct SearchState {
    /// Rooms each wall already borders.
    counters: SecondaryMap<WallId, u8>,
    deadlocked: SecondaryMap<WallId, ()>,
    /// Directed walls already part of a room.
    used: HashSet<RoomWall>,
}

impl SearchState {
    fn counter(&self, id: WallId) -> u8 {
        self.counters.get(id).copied().unwrap_or(0)
    }

    fn is_deadlocked(&self, id: WallId) -> bool {
        self.deadlocked.contains_key(id)
    }
}

/// One step of the depth-first walk.
struct Frame {
    wall: RoomWall,
    /// Candidates leaving the end of `wall`, rightmost first.
    candidates: Vec<RoomWall>,
    next: usize,
    /// No other wall touches the end of `wall`.
    dangling: bool,
}

impl<'a> FindRooms<'a> {
    /// Creates a new `FindRooms` operation.
    #[must_use]
    pub fn new(graph: &'a WallGraph) -> Self {
        Self { graph }
    }

    /// Executes the search.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::WallNotFound` if the graph refers to a missing
    /// wall.
    pub fn execute(&self) -> Result<Vec<Room>> {
        let mut state = SearchState::default();
        let mut tried: HashSet<RoomWall> = HashSet::new();
        let mut rooms = Vec::new();

        for &id in self.graph.ids() {
            if state.counter(id) > 0 || state.is_deadlocked(id) {
                continue;
            }
            for reversed in [false, true] {
                let seed = RoomWall::new(id, reversed);
                if state.is_deadlocked(id) || state.used.contains(&seed) || !tried.insert(seed) {
                    continue;
                }
                debug!(wall = ?id, reversed, "room search seed");

                let Some(walls) = self.search(seed, &mut state)? else {
                    continue;
                };
                let area = self.loop_area(&walls)?;
                if area >= 0.0 {
                    debug!(wall = ?id, reversed, area, "rejected unbounded loop");
                    continue;
                }

                for rw in &walls {
                    if let Some(count) = state.counters.get_mut(rw.wall) {
                        *count += 1;
                    } else {
                        state.counters.insert(rw.wall, 1);
                    }
                    state.used.insert(*rw);
                }
                debug!(walls = walls.len(), area = -area, "room found");
                rooms.push(Room::new(walls));
                break;
            }
        }
        Ok(rooms)
    }

    /// Depth-first walk from `seed` back to itself. Returns the loop, or
    /// `None` if every branch dead-ends.
    fn search(&self, seed: RoomWall, state: &mut SearchState) -> Result<Option<Vec<RoomWall>>> {
        let mut explored: HashSet<RoomWall> = HashSet::from([seed]);
        let mut stack = vec![self.frame(seed, seed, &[], state)?];

        while let Some(top) = stack.last_mut() {
            let Some(&candidate) = top.candidates.get(top.next) else {
                if top.candidates.is_empty() && top.dangling {
                    let id = top.wall.wall;
                    if state.deadlocked.insert(id, ()).is_none() {
                        trace!(wall = ?id, "wall deadlocked");
                    }
                }
                stack.pop();
                continue;
            };
            top.next += 1;

            if candidate == seed {
                return Ok(Some(stack.iter().map(|f| f.wall).collect()));
            }
            if !explored.insert(candidate) {
                continue;
            }
            let frame = self.frame(candidate, seed, &stack, state)?;
            stack.push(frame);
        }
        Ok(None)
    }

    fn frame(
        &self,
        wall: RoomWall,
        seed: RoomWall,
        path: &[Frame],
        state: &SearchState,
    ) -> Result<Frame> {
        let current = self.graph.wall(wall.wall)?;
        let end = wall.end(current);
        let back = -wall.incoming(current);

        let touching = self.graph.walls_at(&end);
        let dangling = touching.iter().all(|&id| id == wall.wall);

        let mut scored: Vec<(f64, RoomWall)> = Vec::new();
        for &id in touching {
            if id == wall.wall
                || state.is_deadlocked(id)
                || state.counter(id) >= MAX_ROOMS_PER_WALL
            {
                continue;
            }
            let Some(oriented) = self.graph.orient(id, &end, true)? else {
                continue;
            };
            let in_path = path.iter().any(|f| f.wall.wall == id);
            if (in_path && oriented != seed) || state.used.contains(&oriented) {
                continue;
            }
            let other = self.graph.wall(id)?;
            scored.push((ccw_angle(&back, &oriented.outgoing(other)), oriented));
        }
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));

        Ok(Frame {
            wall,
            candidates: scored.into_iter().map(|(_, rw)| rw).collect(),
            next: 0,
            dangling,
        })
    }

    /// Signed plan area enclosed by a loop, negative when clockwise.
    fn loop_area(&self, walls: &[RoomWall]) -> Result<f64> {
        let mut outline: Vec<Point2> = Vec::new();
        for rw in walls {
            let wall = self.graph.wall(rw.wall)?;
            outline.extend(rw.points(wall));
        }
        Ok(signed_area_2d(&dedup_closed(&outline, self.graph.tolerance())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::plan::{Wall, WallDef};
    use crate::tessellation::MeshParams;

    fn wall(x0: f64, y0: f64, x1: f64, y1: f64) -> Wall {
        WallDef::straight(Point2::new(x0, y0), Point2::new(x1, y1), 0.1, 2.0)
            .build(&MeshParams::default())
            .unwrap()
    }

    fn counters(rooms: &[Room]) -> HashMap<WallId, usize> {
        let mut map = HashMap::new();
        for room in rooms {
            for rw in room.walls() {
                *map.entry(rw.wall).or_insert(0) += 1;
            }
        }
        map
    }

    #[test]
    fn single_square_clockwise() {
        let graph = WallGraph::from_walls(
            [
                wall(0.0, 0.0, 0.0, 2.0),
                wall(0.0, 2.0, 2.0, 2.0),
                wall(2.0, 2.0, 2.0, 0.0),
                wall(2.0, 0.0, 0.0, 0.0),
            ],
            1e-6,
        );
        let rooms = FindRooms::new(&graph).execute().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 4);
        assert!(rooms[0].walls().iter().all(|rw| !rw.reversed));
        assert!(counters(&rooms).values().all(|&c| c == 1));
    }

    #[test]
    fn single_square_counter_clockwise_is_walked_backwards() {
        let graph = WallGraph::from_walls(
            [
                wall(0.0, 0.0, 1.0, 0.0),
                wall(1.0, 0.0, 1.0, 1.0),
                wall(1.0, 1.0, 0.0, 1.0),
                wall(0.0, 1.0, 0.0, 0.0),
            ],
            1e-6,
        );
        let rooms = FindRooms::new(&graph).execute().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 4);
        assert!(rooms[0].walls().iter().all(|rw| rw.reversed));
        assert!(counters(&rooms).values().all(|&c| c == 1));
    }

    #[test]
    fn two_rooms_share_a_wall() {
        let mut graph = WallGraph::new(1e-6);
        graph.add_wall(wall(0.0, 0.0, 0.0, 1.0));
        graph.add_wall(wall(0.0, 1.0, 1.0, 1.0));
        let shared = graph.add_wall(wall(1.0, 1.0, 1.0, 0.0));
        graph.add_wall(wall(1.0, 0.0, 0.0, 0.0));
        graph.add_wall(wall(1.0, 1.0, 2.0, 1.0));
        graph.add_wall(wall(2.0, 1.0, 2.0, 0.0));
        graph.add_wall(wall(2.0, 0.0, 1.0, 0.0));

        let rooms = FindRooms::new(&graph).execute().unwrap();
        assert_eq!(rooms.len(), 2);
        assert!(rooms.iter().all(|r| r.len() == 4));

        let counts = counters(&rooms);
        assert_eq!(counts[&shared], 2);
        assert_eq!(counts.values().filter(|&&c| c == 1).count(), 6);

        let directions: Vec<bool> = rooms
            .iter()
            .flat_map(|r| r.walls().iter().filter(|rw| rw.wall == shared).map(|rw| rw.reversed))
            .collect();
        assert_eq!(directions.len(), 2);
        assert_ne!(directions[0], directions[1]);
    }

    #[test]
    fn dangling_wall_is_left_out() {
        let mut graph = WallGraph::new(1e-6);
        graph.add_wall(wall(0.0, 0.0, 0.0, 2.0));
        graph.add_wall(wall(0.0, 2.0, 2.0, 2.0));
        // A stub poking into the room from the top wall's end.
        let stub = graph.add_wall(wall(2.0, 2.0, 1.0, 1.0));
        graph.add_wall(wall(2.0, 2.0, 2.0, 0.0));
        graph.add_wall(wall(2.0, 0.0, 0.0, 0.0));

        let rooms = FindRooms::new(&graph).execute().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].len(), 4);
        assert!(!rooms[0].contains(stub));
    }

    #[test]
    fn open_chain_has_no_rooms() {
        let graph = WallGraph::from_walls(
            [
                wall(0.0, 0.0, 0.0, 2.0),
                wall(0.0, 2.0, 2.0, 2.0),
                wall(2.0, 2.0, 2.0, 0.0),
            ],
            1e-6,
        );
        assert!(FindRooms::new(&graph).execute().unwrap().is_empty());
    }
}
