use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::point_to_segment_dist;
use crate::math::{Isometry2, Line2D, Point2, Vector2};

/// A polyline straightened onto the x-axis.
///
/// Vertex `i` of the polyline maps to `(s_i, 0)`, where `s_i` is the
/// arc length up to that vertex. Each segment has its own rigid frame, so
/// points near the polyline can be moved between plan space ("folded") and
/// the straight frame ("unfolded") where x is the distance along the curve
/// and y the signed offset to its left.
#[derive(Debug, Clone)]
pub struct UnfoldedCurve {
    original: Vec<Point2>,
    unfolded: Vec<Point2>,
    /// Per vertex: plan space to the frame of the segment leaving it. The
    /// last vertex reuses the frame of the final segment.
    folds: Vec<Isometry2>,
    /// Inverses of `folds`.
    unfolds: Vec<Isometry2>,
}

impl UnfoldedCurve {
    /// Builds the unfolded representation of `points`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if fewer than two points are
    /// given or two consecutive points coincide.
    pub fn new(points: &[Point2]) -> Result<Self> {
        let Some(first) = points.first() else {
            return Err(GeometryError::Degenerate("empty polyline".into()).into());
        };
        if points.len() < 2 {
            return Err(GeometryError::Degenerate("polyline needs at least 2 points".into()).into());
        }

        let n = points.len();
        let mut frame = Isometry2::translation(-first.x, -first.y);
        let mut folds = Vec::with_capacity(n);
        let mut unfolded = Vec::with_capacity(n);

        for pair in points.windows(2) {
            let here = frame * pair[0];
            let next = frame * pair[1];
            let angle = Line2D::new(&here, &next)?.angle();
            frame = Isometry2::translation(here.x, here.y)
                * Isometry2::rotation(-angle)
                * Isometry2::translation(-here.x, -here.y)
                * frame;
            folds.push(frame);
            unfolded.push(frame * pair[0]);
        }
        folds.push(frame);
        unfolded.push(frame * points[n - 1]);

        let unfolds = folds.iter().map(Isometry2::inverse).collect();
        Ok(Self {
            original: points.to_vec(),
            unfolded,
            folds,
            unfolds,
        })
    }

    /// The polyline in plan space.
    #[must_use]
    pub fn original_points(&self) -> &[Point2] {
        &self.original
    }

    /// The polyline laid out along the x-axis.
    #[must_use]
    pub fn unfolded_points(&self) -> &[Point2] {
        &self.unfolded
    }

    /// Total arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.unfolded.last().map_or(0.0, |p| p.x)
    }

    /// Index of the segment whose unfolded x-range contains `x`.
    ///
    /// Values before the start use the first segment, values past the end
    /// use the last one.
    #[must_use]
    pub fn segment_at(&self, x: f64) -> usize {
        let last_segment = self.unfolded.len() - 2;
        self.unfolded[..=last_segment]
            .iter()
            .rposition(|p| p.x <= x)
            .unwrap_or(0)
    }

    /// Index of the plan-space segment closest to `point`.
    #[must_use]
    pub fn nearest_segment(&self, point: &Point2) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, pair) in self.original.windows(2).enumerate() {
            let d = point_to_segment_dist(point, &pair[0], &pair[1]);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        best
    }

    /// Maps a point of the straight frame back into plan space.
    #[must_use]
    pub fn unfold(&self, point: &Point2) -> Point2 {
        self.unfolds[self.segment_at(point.x)].transform_point(point)
    }

    /// Maps a plan-space point into the straight frame, using the frame of
    /// the nearest segment.
    #[must_use]
    pub fn fold(&self, point: &Point2) -> Point2 {
        self.folds[self.nearest_segment(point)].transform_point(point)
    }

    /// Unit plan-space direction of the curve at unfolded position `x`.
    #[must_use]
    pub fn tangent_at(&self, x: f64) -> Vector2 {
        self.unfolds[self.segment_at(x)].transform_vector(&Vector2::x())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn l_shape() -> UnfoldedCurve {
        UnfoldedCurve::new(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn straight_vertical_segment() {
        let c = UnfoldedCurve::new(&[Point2::new(1.0, 1.0), Point2::new(1.0, 5.0)]).unwrap();
        assert_relative_eq!(c.length(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(c.unfolded_points()[1], Point2::new(4.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(
            c.unfold(&Point2::new(2.0, 0.0)),
            Point2::new(1.0, 3.0),
            epsilon = 1e-12
        );
        // Positive offsets lie to the left of the direction of travel.
        assert_relative_eq!(
            c.unfold(&Point2::new(2.0, 0.5)),
            Point2::new(0.5, 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn bent_polyline_lays_out_by_arc_length() {
        let c = l_shape();
        let xs: Vec<f64> = c.unfolded_points().iter().map(|p| p.x).collect();
        assert_relative_eq!(xs[0], 0.0);
        assert_relative_eq!(xs[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(xs[2], 5.0, epsilon = 1e-12);
        for p in c.unfolded_points() {
            assert!(p.y.abs() < 1e-12);
        }
        assert_relative_eq!(
            c.unfold(&Point2::new(3.5, 0.0)),
            Point2::new(2.0, 1.5),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            c.fold(&Point2::new(2.0, 1.5)),
            Point2::new(3.5, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn fold_then_unfold_round_trips() {
        let c = UnfoldedCurve::new(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(2.0, 0.6),
            Point2::new(3.0, 0.2),
        ])
        .unwrap();
        let probes = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(0.5, 0.3),
            Point2::new(1.5, 0.5),
            Point2::new(2.5, 0.45),
            Point2::new(3.0, 0.2),
        ];
        for p in probes {
            let back = c.unfold(&c.fold(&p));
            assert!((back - p).norm() < 1e-9, "{p:?} came back as {back:?}");
        }
    }

    #[test]
    fn segment_lookup_clamps_to_ends() {
        let c = l_shape();
        assert_eq!(c.segment_at(-1.0), 0);
        assert_eq!(c.segment_at(1.0), 0);
        assert_eq!(c.segment_at(2.5), 1);
        assert_eq!(c.segment_at(9.0), 1);
        assert_relative_eq!(c.tangent_at(4.0), Vector2::new(0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(UnfoldedCurve::new(&[Point2::new(0.0, 0.0)]).is_err());
        assert!(UnfoldedCurve::new(&[Point2::new(1.0, 1.0), Point2::new(1.0, 1.0)]).is_err());
    }
}
