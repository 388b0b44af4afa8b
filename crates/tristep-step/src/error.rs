//! Error types for STEP export.

use thiserror::Error;

/// Errors that can occur while encoding a mesh as STEP.
#[derive(Error, Debug)]
pub enum StepError {
    /// A triangle corner has a NaN or infinite coordinate, which has no
    /// STEP real representation.
    #[error("Non-finite coordinate in triangle {triangle}: ({x}, {y}, {z})")]
    NonFiniteCoordinate {
        /// Triangle number in traversal order (0-indexed).
        triangle: usize,
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
        /// Z coordinate.
        z: f64,
    },

    /// An entity reference does not name an entity of the graph being
    /// written: it was issued by a different graph.
    #[error("Unresolved entity reference to graph position {0}")]
    UnresolvedReference(usize),

    /// Options file could not be parsed.
    #[error("Invalid export options: {0}")]
    Config(#[from] toml::de::Error),

    /// Text formatting failed.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

impl StepError {
    /// Create a non-finite coordinate error.
    pub fn non_finite(triangle: usize, p: &tristep_math::Point3) -> Self {
        Self::NonFiniteCoordinate {
            triangle,
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}
