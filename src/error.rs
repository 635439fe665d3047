use thiserror::Error;

/// Top-level error type for wall mesh generation.
#[derive(Debug, Error)]
pub enum WallmeshError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("lines are parallel: {0}")]
    ParallelLines(String),
}

/// Errors caused by malformed floor-plan input.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid wall {wall}: {reason}")]
    InvalidWall { wall: String, reason: String },

    #[error("invalid opening {opening} on wall {wall}: {reason}")]
    InvalidOpening {
        wall: String,
        opening: usize,
        reason: String,
    },

    #[error("wall not found in graph")]
    WallNotFound,

    #[error("wall {wall} has no next neighbor on its {side} side to inherit its width from")]
    MissingNeighbor { wall: String, side: &'static str },
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("invalid contour {contour}: {reason}")]
    InvalidContour { contour: String, reason: String },

    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`WallmeshError`].
pub type Result<T> = std::result::Result<T, WallmeshError>;
