pub mod line_2d;
pub mod polygon_2d;

pub use line_2d::Line2D;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type. Plan coordinates map to `x`/`y`, wall height to `z`.
pub type Point3 = nalgebra::Point3<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Homogeneous 2D transformation matrix.
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Rigid 2D transform (rotation followed by translation).
pub type Isometry2 = nalgebra::Isometry2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Relative tolerance used by [`approx_eq`].
pub const RELATIVE_EPSILON: f64 = 1e-6;

/// Absolute floor used by [`approx_eq`] for values near zero.
pub const ABSOLUTE_EPSILON: f64 = 1e-9;

/// Approximate equality with a relative tolerance and an absolute floor.
///
/// Slopes and line coefficients span many orders of magnitude, so a pure
/// absolute comparison would treat steep lines as always distinct.
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() < (RELATIVE_EPSILON * a.abs().max(b.abs())).max(ABSOLUTE_EPSILON)
}

/// Lifts a plan point to 3D at the given height.
#[must_use]
pub fn lift(point: &Point2, height: f64) -> Point3 {
    Point3::new(point.x, point.y, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approx_eq_relative_for_large_values() {
        assert!(approx_eq(1.0e8, 1.0e8 + 1.0));
        assert!(!approx_eq(1.0, 1.001));
    }

    #[test]
    fn approx_eq_absolute_near_zero() {
        assert!(approx_eq(0.0, 1e-12));
        assert!(!approx_eq(0.0, 1e-6));
    }

    #[test]
    fn infinities_compare_equal() {
        assert!(approx_eq(f64::INFINITY, f64::INFINITY));
        assert!(!approx_eq(f64::INFINITY, 1.0e300));
    }
}
