use tracing::debug;

use crate::error::{PlanError, Result};
use crate::math::Point2;
use crate::plan::{Side, Wall, WidthChange};

use super::WallNeighbors;

/// Where a wall's inner and outer boundaries begin and end once joined to
/// its neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPoints {
    pub inner_start: Point2,
    pub inner_end: Point2,
    pub outer_start: Point2,
    pub outer_end: Point2,
}

impl JointPoints {
    #[must_use]
    pub fn start(&self, side: Side) -> Point2 {
        match side {
            Side::Inner => self.inner_start,
            Side::Outer => self.outer_start,
        }
    }

    #[must_use]
    pub fn end(&self, side: Side) -> Point2 {
        match side {
            Side::Inner => self.inner_end,
            Side::Outer => self.outer_end,
        }
    }

    /// Boundary polyline of one side: the start joint, the wall's interior
    /// offset points, then the end joint.
    #[must_use]
    pub fn boundary(&self, wall: &Wall, side: Side) -> Vec<Point2> {
        let offsets = wall.profile().points(side);
        let mut points = Vec::with_capacity(offsets.len());
        points.push(self.start(side));
        points.extend_from_slice(&offsets[1..offsets.len() - 1]);
        points.push(self.end(side));
        points
    }
}

/// Computes the joint points of a wall.
///
/// Each boundary end is the intersection of the wall's first (or last)
/// boundary line with the matching boundary line of the neighbor on that
/// side. Without a neighbor, or when the lines are parallel, the start keeps
/// the wall's own offset point and the end follows the wall's
/// [`WidthChange`] policy.
pub struct WallJointResolver<'a> {
    wall: &'a Wall,
    neighbors: &'a WallNeighbors,
}

impl<'a> WallJointResolver<'a> {
    /// Creates a new `WallJointResolver` operation.
    #[must_use]
    pub fn new(wall: &'a Wall, neighbors: &'a WallNeighbors) -> Self {
        Self { wall, neighbors }
    }

    /// Executes the resolution.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::MissingNeighbor` if a [`WidthChange::Type2`] end has
    /// no next neighbor to snap to, or a geometry error if the projection onto
    /// the neighbor fails.
    pub fn execute(&self) -> Result<JointPoints> {
        Ok(JointPoints {
            inner_start: self.start(Side::Inner),
            inner_end: self.end(Side::Inner)?,
            outer_start: self.start(Side::Outer),
            outer_end: self.end(Side::Outer)?,
        })
    }

    fn start(&self, side: Side) -> Point2 {
        let own_line = self.wall.profile().first_lines().side(side);
        let prev = self.neighbors.prev(side);
        if let Some(joint) = prev.and_then(|p| p.profile().last_lines().side(side).intersect(own_line)) {
            return joint;
        }
        if prev.is_some() {
            debug!(
                wall = %self.wall.label(),
                side = side.name(),
                "start parallel to previous wall, keeping own offset"
            );
        }
        self.wall.profile().points(side)[0]
    }

    fn end(&self, side: Side) -> Result<Point2> {
        let own_line = self.wall.profile().last_lines().side(side);
        let next = self.neighbors.next(side);
        if let Some(joint) =
            next.and_then(|n| own_line.intersect(n.profile().first_lines().side(side)))
        {
            return Ok(joint);
        }

        match self.wall.width_change() {
            WidthChange::Type1 => {
                if next.is_some() {
                    debug!(
                        wall = %self.wall.label(),
                        side = side.name(),
                        "end parallel to next wall, keeping own offset"
                    );
                }
                let offsets = self.wall.profile().points(side);
                Ok(offsets[offsets.len() - 1])
            }
            WidthChange::Type2 => {
                let Some(next) = next else {
                    return Err(PlanError::MissingNeighbor {
                        wall: self.wall.label(),
                        side: side.name(),
                    }
                    .into());
                };
                debug!(
                    wall = %self.wall.label(),
                    side = side.name(),
                    "width change, snapping to neighbor boundary"
                );
                next.profile().first_lines().side(side).project_point(
                    &next.start(),
                    &next.profile().normal(side, 0),
                )
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::plan::WallDef;
    use crate::tessellation::MeshParams;

    fn wall(x0: f64, y0: f64, x1: f64, y1: f64, width: f64) -> WallDef {
        WallDef::straight(Point2::new(x0, y0), Point2::new(x1, y1), width, 2.5)
    }

    fn build(def: WallDef) -> Wall {
        def.build(&MeshParams::default()).unwrap()
    }

    #[test]
    fn square_corners_are_mitered() {
        let a = build(wall(0.0, 0.0, 0.0, 2.0, 0.2));
        let neighbors = WallNeighbors::default()
            .with_prev(build(wall(2.0, 0.0, 0.0, 0.0, 0.2)))
            .with_next(build(wall(0.0, 2.0, 2.0, 2.0, 0.2)));
        let joints = WallJointResolver::new(&a, &neighbors).execute().unwrap();

        assert_relative_eq!(joints.inner_start, Point2::new(0.1, 0.1), epsilon = 1e-12);
        assert_relative_eq!(joints.outer_start, Point2::new(-0.1, -0.1), epsilon = 1e-12);
        assert_relative_eq!(joints.inner_end, Point2::new(0.1, 1.9), epsilon = 1e-12);
        assert_relative_eq!(joints.outer_end, Point2::new(-0.1, 2.1), epsilon = 1e-12);

        let boundary = joints.boundary(&a, Side::Inner);
        assert_eq!(boundary.len(), 2);
    }

    #[test]
    fn collinear_neighbor_keeps_own_offsets() {
        let a = build(wall(0.0, 0.0, 0.0, 2.0, 0.2));
        let neighbors = WallNeighbors::default().with_next(build(wall(0.0, 2.0, 0.0, 4.0, 0.4)));
        let joints = WallJointResolver::new(&a, &neighbors).execute().unwrap();
        assert_relative_eq!(joints.inner_end, Point2::new(0.1, 2.0), epsilon = 1e-12);
        assert_relative_eq!(joints.outer_end, Point2::new(-0.1, 2.0), epsilon = 1e-12);
        assert_relative_eq!(joints.inner_start, Point2::new(0.1, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn width_change_snaps_to_wider_neighbor() {
        let a = build(wall(0.0, 0.0, 0.0, 2.0, 0.2).with_width_change(WidthChange::Type2));
        let neighbors = WallNeighbors::default().with_next(build(wall(0.0, 2.0, 0.0, 4.0, 0.4)));
        let joints = WallJointResolver::new(&a, &neighbors).execute().unwrap();
        assert_relative_eq!(joints.inner_end, Point2::new(0.2, 2.0), epsilon = 1e-12);
        assert_relative_eq!(joints.outer_end, Point2::new(-0.2, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn width_change_without_neighbor_fails() {
        let a = build(wall(0.0, 0.0, 0.0, 2.0, 0.2).with_width_change(WidthChange::Type2));
        let result = WallJointResolver::new(&a, &WallNeighbors::default()).execute();
        assert!(matches!(
            result,
            Err(crate::error::WallmeshError::Plan(PlanError::MissingNeighbor { .. }))
        ));
    }
}
