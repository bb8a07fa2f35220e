//! Error types for dose grid operations.
//!
//! Every failure is raised close to where it is detected and propagated
//! unchanged; no operation produces partial output.

use thiserror::Error;

/// Main error type for alignment, interpolation and combination.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DoseError {
    /// Zero/negative derived spacing, or an empty or inverted overlap.
    #[error("Degenerate grid: {0}")]
    DegenerateGrid(String),

    /// An interpolation query fell outside the source lattice.
    #[error("Index {index:?} out of bounds for volume of shape {shape:?} (frames, rows, columns)")]
    OutOfBounds {
        index: [f64; 3],
        shape: [usize; 3],
    },

    /// Sample buffer disagrees with the declared dimensions.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Geometry violates a construction invariant.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Scaling factor is not a positive finite number.
    #[error("Invalid dose grid scaling: {0}")]
    InvalidScaling(f64),

    /// A combined sample cannot be stored as an unsigned 32-bit value.
    #[error("Combined sample {value} at voxel {index} is not representable as u32")]
    InvalidSample { index: usize, value: f64 },

    /// The interpolation backend failed.
    #[error("Interpolation backend error: {0}")]
    Backend(String),

    /// The operation was cancelled between batches.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type for dose grid operations.
pub type Result<T> = std::result::Result<T, DoseError>;

impl DoseError {
    /// Create a degenerate grid error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateGrid(msg.into())
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Create a backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = DoseError::degenerate("empty overlap on x");
        assert!(matches!(err, DoseError::DegenerateGrid(_)));
    }

    #[test]
    fn test_error_display() {
        let err = DoseError::degenerate("empty overlap on x");
        assert_eq!(err.to_string(), "Degenerate grid: empty overlap on x");
    }

    #[test]
    fn test_shape_mismatch() {
        let err = DoseError::ShapeMismatch {
            expected: vec![4, 10, 8],
            actual: vec![319],
        };
        let err_str = err.to_string();
        assert!(err_str.contains("expected"));
        assert!(err_str.contains("got"));
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = DoseError::OutOfBounds {
            index: [-0.5, 0.0, 0.0],
            shape: [2, 2, 2],
        };
        assert!(err.to_string().contains("out of bounds"));
    }
}
