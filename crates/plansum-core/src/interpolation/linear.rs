//! Scalar per-element trilinear interpolation.

use serde::{Deserialize, Serialize};

use super::trait_::{check_bounds, trilinear, Interpolator};
use crate::error::Result;
use crate::grid::VolumeView;
use crate::spatial::ContinuousIndex;

/// Linear Interpolator.
///
/// Evaluates each index independently on the calling thread. This is the
/// reference definition the other backends are checked against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }

    /// Interpolate a single index.
    pub fn sample(&self, volume: &VolumeView<'_>, index: &ContinuousIndex) -> Result<f64> {
        check_bounds(volume, index)?;
        Ok(trilinear(volume, index))
    }
}

impl Interpolator for LinearInterpolator {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn interpolate(&self, volume: &VolumeView<'_>, indices: &[ContinuousIndex]) -> Result<Vec<f64>> {
        indices
            .iter()
            .map(|index| self.sample(volume, index))
            .collect()
    }
}
