use crate::error::{GeometryError, Result};

use super::{approx_eq, Point2, Vector2, TOLERANCE};

/// An infinite 2D line in general form `A*x + B*y + C = 0`.
///
/// Non-vertical lines also carry their slope-intercept form `y = k*x + b`.
/// A line is vertical exactly when `B` is approximately zero, in which case
/// no slope is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2D {
    a: f64,
    b: f64,
    c: f64,
    slope: Option<(f64, f64)>,
}

impl Line2D {
    /// Creates the line through `from` and `to`.
    ///
    /// The normal vector `(A, B)` is `(from.y - to.y, to.x - from.x)`, the
    /// left-hand normal of the direction `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the points coincide.
    pub fn new(from: &Point2, to: &Point2) -> Result<Self> {
        if (to - from).norm() < TOLERANCE {
            return Err(GeometryError::Degenerate(format!(
                "line through coincident points ({}, {})",
                from.x, from.y
            ))
            .into());
        }
        let a = from.y - to.y;
        let b = to.x - from.x;
        let c = from.x * to.y - to.x * from.y;
        Self::from_coefficients(a, b, c)
    }

    /// Creates a line from its general-form coefficients.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if both `a` and `b` are zero.
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Result<Self> {
        if a.abs() < TOLERANCE && b.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("line with zero normal".into()).into());
        }
        let slope = if approx_eq(b, 0.0) {
            None
        } else {
            Some((-a / b, -c / b))
        };
        Ok(Self { a, b, c, slope })
    }

    /// Coefficient `A`.
    #[must_use]
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Coefficient `B`.
    #[must_use]
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Coefficient `C`.
    #[must_use]
    pub fn c(&self) -> f64 {
        self.c
    }

    /// Slope `k`, or `None` for vertical lines.
    #[must_use]
    pub fn slope(&self) -> Option<f64> {
        self.slope.map(|(k, _)| k)
    }

    /// Y-intercept `b`, or `None` for vertical lines.
    #[must_use]
    pub fn intercept(&self) -> Option<f64> {
        self.slope.map(|(_, b)| b)
    }

    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.slope.is_none()
    }

    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        approx_eq(self.a, 0.0)
    }

    /// Returns `true` if both lines are vertical or their slopes are
    /// approximately equal.
    #[must_use]
    pub fn is_parallel_with(&self, other: &Self) -> bool {
        match (self.slope(), other.slope()) {
            (None, None) => true,
            (Some(k1), Some(k2)) => approx_eq(k1, k2),
            _ => false,
        }
    }

    /// Returns `true` if one line is vertical and the other horizontal, or
    /// the product of the slopes is approximately `-1`.
    #[must_use]
    pub fn is_perpendicular_with(&self, other: &Self) -> bool {
        match (self.slope(), other.slope()) {
            (None, None) => false,
            (None, Some(k)) | (Some(k), None) => approx_eq(k, 0.0),
            (Some(k1), Some(k2)) => approx_eq(k1 * k2, -1.0),
        }
    }

    /// Perpendicular distance from `point` to the line.
    #[must_use]
    pub fn distance_to(&self, point: &Point2) -> f64 {
        (self.a * point.x + self.b * point.y + self.c).abs() / self.a.hypot(self.b)
    }

    /// Intersection point of two lines, or `None` if they are parallel.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Point2> {
        if self.is_parallel_with(other) {
            return None;
        }
        let det = self.a * other.b - other.a * self.b;
        if det.abs() < TOLERANCE * TOLERANCE {
            return None;
        }
        let x = -(self.c * other.b - other.c * self.b) / det;
        let y = -(self.a * other.c - other.a * self.c) / det;
        Some(Point2::new(x, y))
    }

    /// Projects `point` onto this line along `direction`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if `direction` has zero length, or
    /// `GeometryError::ParallelLines` if `direction` is parallel to the line.
    pub fn project_point(&self, point: &Point2, direction: &Vector2) -> Result<Point2> {
        if direction.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let ray = Self::new(point, &(point + direction))?;
        self.intersect(&ray).ok_or_else(|| {
            GeometryError::ParallelLines(format!(
                "projection direction ({}, {}) runs along the target line",
                direction.x, direction.y
            ))
            .into()
        })
    }

    /// The unnormalized normal vector `(A, B)`.
    #[must_use]
    pub fn normal_vector(&self) -> Vector2 {
        Vector2::new(self.a, self.b)
    }

    /// Direction angle in radians, `atan2(-A, B)`.
    ///
    /// For a line built with [`Line2D::new`] this is the angle of `to - from`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        (-self.a).atan2(self.b)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line2D {
        Line2D::new(&Point2::new(x0, y0), &Point2::new(x1, y1)).unwrap()
    }

    #[test]
    fn coefficients_from_two_points() {
        let l = line(1.0, 2.0, 3.0, 5.0);
        assert_relative_eq!(l.a(), -3.0);
        assert_relative_eq!(l.b(), 2.0);
        assert_relative_eq!(l.c(), -1.0);
        assert_relative_eq!(l.slope().unwrap(), 1.5);
        assert_relative_eq!(l.intercept().unwrap(), 0.5);
    }

    #[test]
    fn coincident_points_rejected() {
        let p = Point2::new(1.0, 1.0);
        assert!(Line2D::new(&p, &p).is_err());
        assert!(Line2D::from_coefficients(0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn vertical_and_horizontal() {
        let v = line(2.0, 0.0, 2.0, 5.0);
        assert!(v.is_vertical());
        assert!(!v.is_horizontal());
        assert!(v.slope().is_none());

        let h = line(0.0, 1.0, 4.0, 1.0);
        assert!(h.is_horizontal());
        assert!(!h.is_vertical());
    }

    #[test]
    fn parallel_is_reflexive_and_symmetric() {
        let l1 = line(0.0, 0.0, 1.0, 1.0);
        let l2 = line(0.0, 3.0, 2.0, 5.0);
        let l3 = line(0.0, 0.0, 1.0, 2.0);
        assert!(l1.is_parallel_with(&l1));
        assert!(l1.is_parallel_with(&l2));
        assert!(l2.is_parallel_with(&l1));
        assert!(!l1.is_parallel_with(&l3));
        assert!(!l3.is_parallel_with(&l1));

        let v1 = line(0.0, 0.0, 0.0, 1.0);
        let v2 = line(4.0, 0.0, 4.0, -1.0);
        assert!(v1.is_parallel_with(&v2));
        assert!(v2.is_parallel_with(&v1));
        assert!(!v1.is_parallel_with(&l1));
    }

    #[test]
    fn perpendicular_lines() {
        let l1 = line(0.0, 0.0, 1.0, 1.0);
        let l2 = line(0.0, 0.0, 1.0, -1.0);
        assert!(l1.is_perpendicular_with(&l2));
        assert!(l2.is_perpendicular_with(&l1));

        let v = line(0.0, 0.0, 0.0, 1.0);
        let h = line(0.0, 0.0, 1.0, 0.0);
        assert!(v.is_perpendicular_with(&h));
        assert!(h.is_perpendicular_with(&v));
        assert!(!l1.is_perpendicular_with(&h));
    }

    #[test]
    fn intersection_lies_on_both_lines() {
        let cases = [
            (line(0.0, 0.0, 4.0, 4.0), line(0.0, 4.0, 4.0, 0.0)),
            (line(1.0, -3.0, 1.0, 7.0), line(-2.0, 0.5, 9.0, 3.0)),
            (line(-5.0, 2.0, 3.0, 2.0), line(0.0, 0.0, 0.3, 1.7)),
        ];
        for (l1, l2) in cases {
            let p = l1.intersect(&l2).unwrap();
            assert!(l1.distance_to(&p) < 1e-9);
            assert!(l2.distance_to(&p) < 1e-9);
        }
        let p = line(0.0, 0.0, 4.0, 4.0)
            .intersect(&line(0.0, 4.0, 4.0, 0.0))
            .unwrap();
        assert_relative_eq!(p, Point2::new(2.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let l1 = line(0.0, 0.0, 1.0, 1.0);
        let l2 = line(0.0, 1.0, 1.0, 2.0);
        assert!(l1.intersect(&l2).is_none());
    }

    #[test]
    fn distance_to_point() {
        let l = line(0.0, 0.0, 10.0, 0.0);
        assert_relative_eq!(l.distance_to(&Point2::new(3.0, 4.0)), 4.0);
        let d = line(0.0, 0.0, 1.0, 1.0);
        assert_relative_eq!(
            d.distance_to(&Point2::new(1.0, 0.0)),
            std::f64::consts::FRAC_1_SQRT_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn project_along_direction() {
        let l = line(0.0, 0.0, 10.0, 0.0);
        let p = l
            .project_point(&Point2::new(3.0, 5.0), &Vector2::new(1.0, -1.0))
            .unwrap();
        assert_relative_eq!(p, Point2::new(8.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn project_parallel_direction_fails() {
        let l = line(0.0, 0.0, 10.0, 0.0);
        let result = l.project_point(&Point2::new(3.0, 5.0), &Vector2::new(1.0, 0.0));
        assert!(result.is_err());
        let result = l.project_point(&Point2::new(3.0, 5.0), &Vector2::zeros());
        assert!(result.is_err());
    }

    #[test]
    fn normal_and_angle() {
        let l = line(0.0, 0.0, 0.0, 2.0);
        assert_relative_eq!(l.normal_vector(), Vector2::new(-2.0, 0.0));
        assert_relative_eq!(l.angle(), std::f64::consts::FRAC_PI_2);
        let back = line(0.0, 0.0, -1.0, 0.0);
        assert_relative_eq!(back.angle().abs(), std::f64::consts::PI);
    }
}
