use crate::error::{PlanError, Result};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{Point2, Vector2, TOLERANCE};

/// Slack allowed when checking opening contours against the wall extents.
const EXTENT_SLACK: f64 = 1e-6;

/// Which faces of a wall an opening cuts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpeningKind {
    /// A niche visible from the inner face.
    Inner,
    /// A niche visible from the outer face.
    Outer,
    /// A hole through the whole wall (doors, windows).
    Through,
}

impl OpeningKind {
    /// Returns `true` if the opening cuts the inner face.
    #[must_use]
    pub fn reaches_inner(self) -> bool {
        matches!(self, Self::Inner | Self::Through)
    }

    /// Returns `true` if the opening cuts the outer face.
    #[must_use]
    pub fn reaches_outer(self) -> bool {
        matches!(self, Self::Outer | Self::Through)
    }

    /// The kind seen from the other side of the wall.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Inner => Self::Outer,
            Self::Outer => Self::Inner,
            Self::Through => Self::Through,
        }
    }
}

/// A polygonal hole in a wall, in wall-local coordinates.
///
/// `x` is the distance along the wall centerline from the wall start and
/// `y` the height above the floor. Contours are stored counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Opening {
    kind: OpeningKind,
    depth: Option<f64>,
    contour: Vec<Point2>,
}

impl Opening {
    /// Creates an opening from an arbitrary contour, such as a sampled arch.
    #[must_use]
    pub fn from_contour(kind: OpeningKind, contour: Vec<Point2>) -> Self {
        let mut opening = Self {
            kind,
            depth: None,
            contour,
        };
        opening.normalize_winding();
        opening
    }

    /// Creates a rectangular opening with its lower-left corner at `position`.
    #[must_use]
    pub fn rectangle(kind: OpeningKind, position: Point2, size: Vector2) -> Self {
        Self::from_contour(
            kind,
            vec![
                position,
                position + Vector2::new(0.0, size.y),
                position + size,
                position + Vector2::new(size.x, 0.0),
            ],
        )
    }

    /// Sets the niche depth. Ignored for [`OpeningKind::Through`].
    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn kind(&self) -> OpeningKind {
        self.kind
    }

    /// The niche depth, if one was set.
    #[must_use]
    pub fn depth(&self) -> Option<f64> {
        self.depth
    }

    #[must_use]
    pub fn contour(&self) -> &[Point2] {
        &self.contour
    }

    /// Minimum and maximum `x` of the contour.
    #[must_use]
    pub fn x_range(&self) -> (f64, f64) {
        self.contour
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            })
    }

    pub(crate) fn fill_depth(&mut self, default_depth: f64) {
        if self.depth.is_none() {
            self.depth = Some(default_depth);
        }
    }

    /// Checks the opening against the extents of the wall it belongs to.
    pub(crate) fn validate(&self, index: usize, wall: &str, length: f64, height: f64) -> Result<()> {
        let fail = |reason: String| -> Result<()> {
            Err(PlanError::InvalidOpening {
                wall: wall.to_owned(),
                opening: index,
                reason,
            }
            .into())
        };

        if self.contour.len() < 3 {
            return fail(format!("contour has {} points, need at least 3", self.contour.len()));
        }
        if signed_area_2d(&self.contour).abs() < TOLERANCE {
            return fail("contour encloses no area".into());
        }
        for p in &self.contour {
            if p.x < -EXTENT_SLACK || p.x > length + EXTENT_SLACK {
                return fail(format!("x = {} lies outside the wall length {length}", p.x));
            }
            if p.y < -EXTENT_SLACK || p.y > height + EXTENT_SLACK {
                return fail(format!("y = {} lies outside the wall height {height}", p.y));
            }
        }
        if self.kind != OpeningKind::Through {
            if let Some(depth) = self.depth {
                if !(depth > 0.0 && depth.is_finite()) {
                    return fail(format!("depth {depth} must be positive"));
                }
            }
        }
        Ok(())
    }

    /// The same opening seen from the reversed wall: `x` is measured from the
    /// other end and the inner/outer sides swap.
    pub(crate) fn reversed(&self, length: f64) -> Self {
        let mut opening = Self {
            kind: self.kind.reversed(),
            depth: self.depth,
            contour: self
                .contour
                .iter()
                .map(|p| Point2::new(length - p.x, p.y))
                .collect(),
        };
        opening.normalize_winding();
        opening
    }

    fn normalize_winding(&mut self) {
        if signed_area_2d(&self.contour) < 0.0 {
            self.contour.reverse();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn door() -> Opening {
        Opening::rectangle(
            OpeningKind::Through,
            Point2::new(1.0, 0.0),
            Vector2::new(0.9, 2.0),
        )
    }

    #[test]
    fn rectangle_is_counter_clockwise() {
        let o = door();
        assert_eq!(o.contour().len(), 4);
        assert!(signed_area_2d(o.contour()) > 0.0);
        let (lo, hi) = o.x_range();
        assert!((lo - 1.0).abs() < TOLERANCE);
        assert!((hi - 1.9).abs() < TOLERANCE);
    }

    #[test]
    fn kind_sides() {
        assert!(OpeningKind::Through.reaches_inner());
        assert!(OpeningKind::Through.reaches_outer());
        assert!(OpeningKind::Inner.reaches_inner());
        assert!(!OpeningKind::Inner.reaches_outer());
        assert_eq!(OpeningKind::Inner.reversed(), OpeningKind::Outer);
        assert_eq!(OpeningKind::Through.reversed(), OpeningKind::Through);
    }

    #[test]
    fn reversal_mirrors_x_and_swaps_side() {
        let o = Opening::rectangle(OpeningKind::Inner, Point2::new(1.0, 0.5), Vector2::new(1.0, 1.0))
            .with_depth(0.2);
        let r = o.reversed(5.0);
        assert_eq!(r.kind(), OpeningKind::Outer);
        assert_eq!(r.depth(), Some(0.2));
        let (lo, hi) = r.x_range();
        assert!((lo - 3.0).abs() < TOLERANCE);
        assert!((hi - 4.0).abs() < TOLERANCE);
        assert!(signed_area_2d(r.contour()) > 0.0);
    }

    #[test]
    fn validation_catches_out_of_range_contours() {
        assert!(door().validate(0, "w", 4.0, 2.5).is_ok());
        assert!(door().validate(0, "w", 1.5, 2.5).is_err());
        assert!(door().validate(0, "w", 4.0, 1.5).is_err());

        let flat = Opening::from_contour(
            OpeningKind::Inner,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)],
        );
        assert!(flat.validate(3, "w", 4.0, 2.5).is_err());

        let shallow = Opening::rectangle(OpeningKind::Outer, Point2::new(0.5, 0.5), Vector2::new(1.0, 1.0))
            .with_depth(0.0);
        assert!(shallow.validate(0, "w", 4.0, 2.5).is_err());
    }
}
