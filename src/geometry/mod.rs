pub mod bezier;
pub mod unfolded_curve;

pub use bezier::QuadraticBezier;
pub use unfolded_curve::UnfoldedCurve;
