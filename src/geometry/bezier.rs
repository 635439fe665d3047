use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2};

/// A quadratic Bezier curve in the plan.
///
/// `P(t) = (1-t)^2 * p0 + 2(1-t)t * p1 + t^2 * p2` for `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier {
    start: Point2,
    control: Point2,
    end: Point2,
}

impl QuadraticBezier {
    /// Creates a new curve from its start, control and end points.
    #[must_use]
    pub fn new(start: Point2, control: Point2, end: Point2) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    #[must_use]
    pub fn control(&self) -> &Point2 {
        &self.control
    }

    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// Evaluates the curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` if `t` is outside `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Result<Point2> {
        check_parameter(t)?;
        let s = 1.0 - t;
        let coords = self.start.coords * (s * s)
            + self.control.coords * (2.0 * s * t)
            + self.end.coords * (t * t);
        Ok(Point2::from(coords))
    }

    /// Derivative of the curve at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` if `t` is outside `[0, 1]`.
    pub fn tangent_at(&self, t: f64) -> Result<Vector2> {
        check_parameter(t)?;
        Ok((self.control - self.start) * (2.0 * (1.0 - t)) + (self.end - self.control) * (2.0 * t))
    }

    /// Samples `quality + 1` points at `t = i / quality`, endpoints included.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ParameterOutOfRange` if `quality < 2`.
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&self, quality: usize) -> Result<Vec<Point2>> {
        if quality < 2 {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "quality",
                value: quality as f64,
                min: 2.0,
                max: f64::INFINITY,
            }
            .into());
        }
        (0..=quality)
            .map(|i| self.point_at(i as f64 / quality as f64))
            .collect()
    }
}

fn check_parameter(t: f64) -> Result<()> {
    if (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter: "t",
            value: t,
            min: 0.0,
            max: 1.0,
        }
        .into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn arch() -> QuadraticBezier {
        QuadraticBezier::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 0.0),
        )
    }

    #[test]
    fn evaluates_endpoints_and_apex() {
        let c = arch();
        assert_relative_eq!(c.point_at(0.0).unwrap(), Point2::new(0.0, 0.0));
        assert_relative_eq!(c.point_at(1.0).unwrap(), Point2::new(2.0, 0.0));
        assert_relative_eq!(c.point_at(0.5).unwrap(), Point2::new(1.0, 1.0));
    }

    #[test]
    fn tangent_at_apex_is_horizontal() {
        let t = arch().tangent_at(0.5).unwrap();
        assert_relative_eq!(t.y, 0.0);
        assert!(t.x > 0.0);
    }

    #[test]
    fn sample_includes_both_endpoints() {
        let pts = arch().sample(4).unwrap();
        assert_eq!(pts.len(), 5);
        assert_relative_eq!(pts[0], Point2::new(0.0, 0.0));
        assert_relative_eq!(pts[4], Point2::new(2.0, 0.0));
        assert_relative_eq!(pts[2], Point2::new(1.0, 1.0));
    }

    #[test]
    fn rejects_low_quality_and_bad_parameter() {
        assert!(arch().sample(1).is_err());
        assert!(arch().point_at(1.5).is_err());
        assert!(arch().tangent_at(-0.1).is_err());
    }
}
