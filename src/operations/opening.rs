use crate::error::{PlanError, Result};
use crate::geometry::UnfoldedCurve;
use crate::math::{lift, Point2, Point3};
use crate::plan::{OpeningKind, Side, Wall};

/// Slack allowed on the along-wall coordinate of an opening point.
const ALONG_SLACK: f64 = 1e-6;

/// An opening placed on one boundary face of a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedOpening {
    /// Index of the opening in [`Wall::openings`].
    pub index: usize,
    pub kind: OpeningKind,
    /// Niche depth; only meaningful for inner and outer openings.
    pub depth: f64,
    /// Contour in the unfolded `(u, h)` frame of the boundary.
    pub points_2d: Vec<Point2>,
    /// Contour on the boundary face in plan space, Z-up.
    pub points_3d: Vec<Point3>,
}

/// Maps opening contours from the centerline onto a boundary face.
///
/// An opening point `(x, h)` is first placed on the centerline at arc
/// length `x`, pushed out to the boundary along the averaged normal of the
/// segment it falls in, then folded into the boundary's own unfolded frame.
/// The resulting `u` differs from `x` wherever the boundary is longer or
/// shorter than the centerline (joints, bends). Height passes through.
pub struct OpeningProjector<'a> {
    wall: &'a Wall,
    side: Side,
    boundary: &'a UnfoldedCurve,
}

impl<'a> OpeningProjector<'a> {
    /// Creates a projector onto `boundary`, the resolved `side` face of `wall`.
    #[must_use]
    pub fn new(wall: &'a Wall, side: Side, boundary: &'a UnfoldedCurve) -> Self {
        Self {
            wall,
            side,
            boundary,
        }
    }

    /// Projects a single opening point into the boundary's `(u, h)` frame.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidOpening` (reported as opening `index`) if
    /// `x` lies outside the centerline.
    pub fn project_point(&self, index: usize, point: &Point2) -> Result<Point2> {
        let centerline = self.wall.centerline();
        let length = centerline.length();
        if point.x < -ALONG_SLACK || point.x > length + ALONG_SLACK {
            return Err(PlanError::InvalidOpening {
                wall: self.wall.label(),
                opening: index,
                reason: format!("x = {} lies outside the wall length {length}", point.x),
            }
            .into());
        }

        let stations = centerline.unfolded_points();
        let last = stations.len() - 1;
        let i = (1..=last)
            .find(|&i| point.x <= stations[i].x)
            .unwrap_or(last);

        let profile = self.wall.profile();
        let averaged = profile.normal(self.side, i) + profile.normal(self.side, i - 1);
        let offset = averaged.try_normalize(f64::EPSILON).unwrap_or_else(|| profile.normal(self.side, i));

        let on_centerline = centerline.unfold(&Point2::new(point.x, 0.0));
        let on_boundary = on_centerline + offset * (self.wall.width() * 0.5);
        let u = self.boundary.fold(&on_boundary).x;
        Ok(Point2::new(u, point.y))
    }

    /// Projects opening `index` of the wall.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidOpening` if the index is out of range or a
    /// contour point lies outside the centerline.
    pub fn project(&self, index: usize) -> Result<ProjectedOpening> {
        let opening = self.wall.openings().get(index).ok_or_else(|| PlanError::InvalidOpening {
            wall: self.wall.label(),
            opening: index,
            reason: format!("wall has {} openings", self.wall.openings().len()),
        })?;

        let points_2d = opening
            .contour()
            .iter()
            .map(|p| self.project_point(index, p))
            .collect::<Result<Vec<_>>>()?;
        let points_3d = points_2d.iter().map(|uh| self.wrap(uh)).collect();

        Ok(ProjectedOpening {
            index,
            kind: opening.kind(),
            depth: opening.depth().unwrap_or(0.0),
            points_2d,
            points_3d,
        })
    }

    /// Projects every opening that cuts this face, in wall order.
    ///
    /// # Errors
    ///
    /// Returns the first projection error.
    pub fn project_all(&self) -> Result<Vec<ProjectedOpening>> {
        self.wall
            .openings()
            .iter()
            .enumerate()
            .filter(|(_, o)| self.side.is_cut_by(o.kind()))
            .map(|(i, _)| self.project(i))
            .collect()
    }

    fn wrap(&self, uh: &Point2) -> Point3 {
        lift(&self.boundary.unfold(&Point2::new(uh.x, 0.0)), uh.y)
    }
}
