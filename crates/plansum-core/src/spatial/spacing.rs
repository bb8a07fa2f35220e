//! Spacing between adjacent voxels along each axis.

use super::Vector;

/// Physical distance between adjacent voxels along each axis.
///
/// Type alias to Vector for semantic clarity. Axis order is
/// (column, row, frame), matching physical (x, y, z).
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Create uniform spacing (same value for all axes).
    pub fn uniform(value: f64) -> Self {
        Self::new([value; D])
    }

    /// True when every component is finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        (0..D).all(|i| self[i].is_finite() && self[i] > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Spacing3 = Spacing<3>;

    #[test]
    fn test_spacing_uniform() {
        assert_eq!(Spacing3::uniform(2.5), Spacing3::new([2.5, 2.5, 2.5]));
    }

    #[test]
    fn test_spacing_is_positive() {
        assert!(Spacing3::new([2.5, 2.5, 3.0]).is_positive());
        assert!(!Spacing3::new([2.5, 0.0, 3.0]).is_positive());
        assert!(!Spacing3::new([2.5, -1.0, 3.0]).is_positive());
        assert!(!Spacing3::new([f64::INFINITY, 1.0, 1.0]).is_positive());
    }
}
