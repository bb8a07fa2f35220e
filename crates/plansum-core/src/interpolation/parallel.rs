//! Rayon-parallel trilinear interpolation.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::trait_::{check_bounds, trilinear, Interpolator};
use crate::error::Result;
use crate::grid::VolumeView;
use crate::spatial::ContinuousIndex;

/// Parallel interpolator.
///
/// Validates the whole batch first, then evaluates indices across the rayon
/// thread pool in chunks of at least `min_chunk` indices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParallelInterpolator {
    min_chunk: usize,
}

impl ParallelInterpolator {
    pub fn new(min_chunk: usize) -> Self {
        Self {
            min_chunk: min_chunk.max(1),
        }
    }

    pub fn min_chunk(&self) -> usize {
        self.min_chunk
    }
}

impl Default for ParallelInterpolator {
    fn default() -> Self {
        Self::new(4096)
    }
}

impl Interpolator for ParallelInterpolator {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn interpolate(&self, volume: &VolumeView<'_>, indices: &[ContinuousIndex]) -> Result<Vec<f64>> {
        indices
            .par_iter()
            .with_min_len(self.min_chunk)
            .try_for_each(|index| check_bounds(volume, index))?;

        Ok(indices
            .par_iter()
            .with_min_len(self.min_chunk)
            .map(|index| trilinear(volume, index))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DoseError;
    use crate::interpolation::LinearInterpolator;
    use crate::spatial::Point3;

    #[test]
    fn test_parallel_matches_scalar() {
        let data: Vec<u32> = (0..(6 * 5 * 4)).map(|v| (v * 37 % 101) as u32).collect();
        let volume = VolumeView::new(&data, [4, 5, 6]).unwrap();
        let indices: Vec<Point3> = (0..200)
            .map(|i| {
                let t = i as f64 / 199.0;
                Point3::new([5.0 * t, 4.0 * (1.0 - t), 3.0 * t * t])
            })
            .collect();

        let expected = LinearInterpolator::new().interpolate(&volume, &indices).unwrap();
        let actual = ParallelInterpolator::new(16).interpolate(&volume, &indices).unwrap();
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_parallel_rejects_out_of_bounds() {
        let data = vec![1u32; 8];
        let volume = VolumeView::new(&data, [2, 2, 2]).unwrap();
        let indices = vec![Point3::new([0.0, 0.0, 0.0]), Point3::new([0.0, 2.0, 0.0])];
        let result = ParallelInterpolator::new(1).interpolate(&volume, &indices);
        assert!(matches!(result, Err(DoseError::OutOfBounds { .. })));
    }
}
