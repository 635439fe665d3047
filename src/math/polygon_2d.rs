use std::f64::consts::TAU;

use super::{Point2, Vector2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns the right-pointing normal `(y, -x)` of a direction vector.
#[must_use]
pub fn right_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(dir.y, -dir.x)
}

/// Normalizes an angle to `[0, 2pi)`.
#[must_use]
pub fn normalize_angle(a: f64) -> f64 {
    let mut r = a % TAU;
    if r < 0.0 {
        r += TAU;
    }
    r
}

/// Counter-clockwise turn from direction `from` to direction `to`, in
/// `(0, 2pi]`. Identical directions count as a full turn.
#[must_use]
pub fn ccw_angle(from: &Vector2, to: &Vector2) -> f64 {
    let delta = normalize_angle(to.y.atan2(to.x) - from.y.atan2(from.x));
    if delta < TOLERANCE {
        TAU
    } else {
        delta
    }
}

/// Returns the minimum distance from `point` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < 1e-20 {
        return (point - a).norm();
    }
    let t = ((point - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (point - (a + d * t)).norm()
}

/// Returns `true` if `point` lies on any edge of the closed polygon.
#[must_use]
pub fn point_on_boundary(point: &Point2, polygon: &[Point2], tolerance: f64) -> bool {
    let n = polygon.len();
    (0..n).any(|i| point_to_segment_dist(point, &polygon[i], &polygon[(i + 1) % n]) <= tolerance)
}

/// Even-odd point-in-polygon test. Points exactly on an edge may land on
/// either side; use [`point_on_boundary`] when that matters.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drops consecutive points closer than `tolerance`, including the wrap
/// from the last point back to the first.
#[must_use]
pub fn dedup_closed(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (p - last).norm() > tolerance) {
            out.push(*p);
        }
    }
    while out.len() > 1
        && out
            .first()
            .zip(out.last())
            .is_some_and(|(f, l)| (f - l).norm() <= tolerance)
    {
        out.pop();
    }
    out
}
