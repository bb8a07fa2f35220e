//! Configuration-selected interpolation backend.

use burn_ndarray::NdArray;
use serde::{Deserialize, Serialize};

use super::{Interpolator, LinearInterpolator, ParallelInterpolator, TensorInterpolator};

/// Which interpolator evaluates resampled grids.
///
/// All variants compute the same trilinear blend; they differ only in how
/// the batch is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationBackend {
    /// Per-element evaluation on the calling thread.
    Scalar,
    /// Rayon thread pool.
    #[default]
    Parallel,
    /// Batched tensor evaluation on the CPU `NdArray<f64>` burn backend.
    Tensor,
}

impl InterpolationBackend {
    /// Every available backend.
    pub const ALL: [InterpolationBackend; 3] = [
        InterpolationBackend::Scalar,
        InterpolationBackend::Parallel,
        InterpolationBackend::Tensor,
    ];

    /// Instantiate the interpolator for this backend.
    pub fn build(self) -> Box<dyn Interpolator> {
        match self {
            Self::Scalar => Box::new(LinearInterpolator::new()),
            Self::Parallel => Box::new(ParallelInterpolator::default()),
            Self::Tensor => Box::new(TensorInterpolator::<NdArray<f64>>::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_names() {
        let names: Vec<&str> = InterpolationBackend::ALL
            .iter()
            .map(|b| b.build().name())
            .collect();
        assert_eq!(names, vec!["scalar", "parallel", "tensor"]);
    }

    #[test]
    fn test_backend_deserialize() {
        let backend: InterpolationBackend = serde_json::from_str("\"tensor\"").unwrap();
        assert_eq!(backend, InterpolationBackend::Tensor);
        assert_eq!(InterpolationBackend::default(), InterpolationBackend::Parallel);
    }
}
