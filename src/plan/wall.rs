use crate::error::{PlanError, Result, WallmeshError};
use crate::geometry::{QuadraticBezier, UnfoldedCurve};
use crate::math::{Line2D, Matrix3, Point2, Vector2};
use crate::tessellation::MeshParams;

use super::opening::Opening;
use super::profile::WallProfile;

/// Niche depth used when neither the opening nor the parameters set one.
pub const DEFAULT_JAMB_DEPTH: f64 = 0.1;

/// How a wall end meets a neighbor whose boundary line it cannot intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthChange {
    /// Keep the wall's own offset endpoint.
    #[default]
    Type1,
    /// Snap to the neighbor's offset start point.
    Type2,
}

/// Centerline shape of a wall before sampling.
#[derive(Debug, Clone, PartialEq)]
pub enum WallShape {
    Straight {
        start: Point2,
        end: Point2,
    },
    Curved {
        curve: QuadraticBezier,
        /// Sample count; falls back to [`MeshParams::bezier_quality`].
        quality: Option<usize>,
    },
}

impl WallShape {
    /// Resolves the shape into centerline points.
    ///
    /// # Errors
    ///
    /// Returns an error if a curved shape is sampled with fewer than 2 steps.
    pub fn points(&self, default_quality: usize) -> Result<Vec<Point2>> {
        match self {
            Self::Straight { start, end } => Ok(vec![*start, *end]),
            Self::Curved { curve, quality } => curve.sample(quality.unwrap_or(default_quality)),
        }
    }
}

/// Input description of one wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallDef {
    pub shape: WallShape,
    pub width: f64,
    pub height: f64,
    pub openings: Vec<Opening>,
    pub width_change: WidthChange,
}

impl WallDef {
    /// A straight wall from `start` to `end`.
    #[must_use]
    pub fn straight(start: Point2, end: Point2, width: f64, height: f64) -> Self {
        Self {
            shape: WallShape::Straight { start, end },
            width,
            height,
            openings: Vec::new(),
            width_change: WidthChange::default(),
        }
    }

    /// A wall following a quadratic Bezier from `start` to `end`.
    #[must_use]
    pub fn curved(start: Point2, control: Point2, end: Point2, width: f64, height: f64) -> Self {
        Self {
            shape: WallShape::Curved {
                curve: QuadraticBezier::new(start, control, end),
                quality: None,
            },
            width,
            height,
            openings: Vec::new(),
            width_change: WidthChange::default(),
        }
    }

    #[must_use]
    pub fn with_openings(mut self, openings: Vec<Opening>) -> Self {
        self.openings = openings;
        self
    }

    #[must_use]
    pub fn with_opening(mut self, opening: Opening) -> Self {
        self.openings.push(opening);
        self
    }

    #[must_use]
    pub fn with_width_change(mut self, width_change: WidthChange) -> Self {
        self.width_change = width_change;
        self
    }

    /// Overrides the sample count of a curved wall. No effect on straight walls.
    #[must_use]
    pub fn with_quality(mut self, quality: usize) -> Self {
        if let WallShape::Curved { quality: q, .. } = &mut self.shape {
            *q = Some(quality);
        }
        self
    }

    /// Samples the shape and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its openings is invalid.
    pub fn build(&self, params: &MeshParams) -> Result<Wall> {
        let points = self.shape.points(params.bezier_quality)?;
        let openings = self
            .openings
            .iter()
            .cloned()
            .map(|mut o| {
                o.fill_depth(params.default_jamb_depth);
                o
            })
            .collect();
        Wall::new(points, self.width, self.height, self.width_change, openings)
    }
}

/// A validated wall with its derived geometry.
///
/// The offset profile and the unfolded centerline are computed once on
/// construction; every transform returns a new wall.
#[derive(Debug, Clone)]
pub struct Wall {
    points: Vec<Point2>,
    width: f64,
    height: f64,
    width_change: WidthChange,
    openings: Vec<Opening>,
    profile: WallProfile,
    centerline: UnfoldedCurve,
}

impl Wall {
    /// Creates a wall from centerline points.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidWall` if there are fewer than two points, a
    /// segment has zero length, or the width or height is not positive, and
    /// `PlanError::InvalidOpening` if an opening falls outside the wall.
    pub fn new(
        points: Vec<Point2>,
        width: f64,
        height: f64,
        width_change: WidthChange,
        mut openings: Vec<Opening>,
    ) -> Result<Self> {
        let label = describe(&points);
        let invalid = |reason: String| -> WallmeshError {
            PlanError::InvalidWall {
                wall: label.clone(),
                reason,
            }
            .into()
        };

        if points.len() < 2 {
            return Err(invalid(format!("{} centerline points, need at least 2", points.len())));
        }
        if !(width > 0.0 && width.is_finite()) {
            return Err(invalid(format!("width {width} must be positive")));
        }
        if !(height > 0.0 && height.is_finite()) {
            return Err(invalid(format!("height {height} must be positive")));
        }

        let centerline = UnfoldedCurve::new(&points).map_err(|e| invalid(e.to_string()))?;
        let profile = WallProfile::new(&points, width).map_err(|e| invalid(e.to_string()))?;

        for (i, opening) in openings.iter_mut().enumerate() {
            opening.fill_depth(DEFAULT_JAMB_DEPTH);
            opening.validate(i, &label, centerline.length(), height)?;
        }

        Ok(Self {
            points,
            width,
            height,
            width_change,
            openings,
            profile,
            centerline,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn width_change(&self) -> WidthChange {
        self.width_change
    }

    #[must_use]
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    #[must_use]
    pub fn profile(&self) -> &WallProfile {
        &self.profile
    }

    /// The centerline straightened along the x-axis.
    #[must_use]
    pub fn centerline(&self) -> &UnfoldedCurve {
        &self.centerline
    }

    /// Length of the centerline.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.centerline.length()
    }

    /// Unit direction of the first segment, pointing away from the start.
    #[must_use]
    pub fn start_direction(&self) -> Vector2 {
        (self.points[1] - self.points[0]).normalize()
    }

    /// Unit direction of the last segment, pointing towards the end.
    #[must_use]
    pub fn end_direction(&self) -> Vector2 {
        let n = self.points.len();
        (self.points[n - 1] - self.points[n - 2]).normalize()
    }

    /// Angle of the first segment traversed backwards, in `(-pi, pi]`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        segment_angle(&self.points[1], &self.points[0])
    }

    /// Angle of the last segment traversed backwards, in `(-pi, pi]`.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        let n = self.points.len();
        segment_angle(&self.points[n - 1], &self.points[n - 2])
    }

    /// The same wall traversed from end to start.
    ///
    /// Opening positions are measured from the new start and inner/outer
    /// niches swap sides.
    ///
    /// # Errors
    ///
    /// Returns an error if the reversed geometry cannot be rebuilt.
    pub fn reversed(&self) -> Result<Self> {
        let mut points = self.points.clone();
        points.reverse();
        let length = self.length();
        let openings = self.openings.iter().map(|o| o.reversed(length)).collect();
        Self::new(points, self.width, self.height, self.width_change, openings)
    }

    /// Applies a homogeneous 2D transform to the centerline. Openings keep
    /// their wall-local coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformed wall is degenerate.
    pub fn transform(&self, matrix: &Matrix3) -> Result<Self> {
        let points = self.points.iter().map(|p| matrix.transform_point(p)).collect();
        Self::new(
            points,
            self.width,
            self.height,
            self.width_change,
            self.openings.clone(),
        )
    }

    /// Short human-readable identification used in error messages.
    #[must_use]
    pub fn label(&self) -> String {
        describe(&self.points)
    }
}

fn segment_angle(from: &Point2, to: &Point2) -> f64 {
    Line2D::new(from, to).map_or(0.0, |line| line.angle())
}

fn describe(points: &[Point2]) -> String {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => format!("({}, {}) -> ({}, {})", a.x, a.y, b.x, b.y),
        _ => "<empty>".into(),
    }
}
