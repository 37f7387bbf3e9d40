//! Error types for bounded Voronoi generation

use thiserror::Error;

/// Errors that can occur while building, clipping or relaxing a diagram
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    /// Two coordinate tuples (or a vector's origin and direction) differ in length
    #[error("dimension mismatch: expected {expected} components, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// Geometry the computation cannot work with (zero-length vector,
    /// parallel boundary intersection, collinear or duplicate generators)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// None of the four domain edges produced a usable crossing for the
    /// boundary cut between two adjacent edge regions
    #[error("no domain boundary intersection between regions {first} and {second}")]
    UnresolvedBoundaryIntersection { first: usize, second: usize },

    /// Configuration or argument validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Projection requires both vectors to share an origin
    #[error("vector origins must be identical")]
    OriginMismatch,

    /// Operation is not defined for this kind of region
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for bounded Voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;
