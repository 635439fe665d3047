use crate::math::{Point2, Vector2};

use super::graph::WallId;
use super::wall::Wall;

/// A wall as traversed by a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomWall {
    pub wall: WallId,
    /// If `true`, the wall is walked from its end to its start.
    pub reversed: bool,
}

impl RoomWall {
    #[must_use]
    pub fn new(wall: WallId, reversed: bool) -> Self {
        Self { wall, reversed }
    }

    /// Where the traversal enters the wall.
    #[must_use]
    pub fn start(&self, wall: &Wall) -> Point2 {
        if self.reversed {
            wall.end()
        } else {
            wall.start()
        }
    }

    /// Where the traversal leaves the wall.
    #[must_use]
    pub fn end(&self, wall: &Wall) -> Point2 {
        if self.reversed {
            wall.start()
        } else {
            wall.end()
        }
    }

    /// Unit direction leaving the traversal start.
    #[must_use]
    pub fn outgoing(&self, wall: &Wall) -> Vector2 {
        if self.reversed {
            -wall.end_direction()
        } else {
            wall.start_direction()
        }
    }

    /// Unit direction arriving at the traversal end.
    #[must_use]
    pub fn incoming(&self, wall: &Wall) -> Vector2 {
        if self.reversed {
            -wall.start_direction()
        } else {
            wall.end_direction()
        }
    }

    /// Centerline points in traversal order.
    #[must_use]
    pub fn points(&self, wall: &Wall) -> Vec<Point2> {
        let mut points = wall.points().to_vec();
        if self.reversed {
            points.reverse();
        }
        points
    }
}

/// A closed loop of walls.
///
/// Consecutive walls share an endpoint and the last wall ends where the
/// first begins. Bounded rooms are traversed clockwise so that every wall's
/// inner side faces the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    walls: Vec<RoomWall>,
}

impl Room {
    #[must_use]
    pub fn new(walls: Vec<RoomWall>) -> Self {
        Self { walls }
    }

    #[must_use]
    pub fn walls(&self) -> &[RoomWall] {
        &self.walls
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Returns `true` if the room passes along `wall` in either direction.
    #[must_use]
    pub fn contains(&self, wall: WallId) -> bool {
        self.walls.iter().any(|w| w.wall == wall)
    }
}
