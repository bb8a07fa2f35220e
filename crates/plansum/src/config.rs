//! Configuration for dose grid combination.

use plansum_core::interpolation::InterpolationBackend;
use serde::{Deserialize, Serialize};

/// How two geometries are tested for lattice coincidence.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoincidencePolicy {
    /// Exact floating-point equality of origin, spacing and frame offsets.
    #[default]
    Exact,
    /// Absolute tolerance on origin, spacing and frame offsets.
    ///
    /// Grids that differ by less than the tolerance are summed directly on
    /// the first grid's lattice instead of being resampled. This changes
    /// results relative to `Exact` and must be opted into explicitly.
    Tolerance(f64),
}

/// Combination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    /// Resample even when the grids are coincident.
    pub force_resample: bool,
    /// Interpolator used on the resample path.
    pub backend: InterpolationBackend,
    /// Coincidence test.
    pub coincidence: CoincidencePolicy,
    /// Output voxels per batch; cancellation and progress are checked
    /// between batches.
    pub batch_voxels: usize,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            force_resample: false,
            backend: InterpolationBackend::default(),
            coincidence: CoincidencePolicy::Exact,
            batch_voxels: 65_536,
        }
    }
}

impl CombineConfig {
    /// Create a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the resample path.
    pub fn with_force_resample(mut self, force: bool) -> Self {
        self.force_resample = force;
        self
    }

    /// Select the interpolation backend.
    pub fn with_backend(mut self, backend: InterpolationBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Accept grids as coincident within an absolute tolerance.
    pub fn with_coincidence_tolerance(mut self, tolerance: f64) -> Self {
        self.coincidence = CoincidencePolicy::Tolerance(tolerance);
        self
    }

    /// Set the number of output voxels per batch (minimum 1).
    pub fn with_batch_voxels(mut self, batch_voxels: usize) -> Self {
        self.batch_voxels = batch_voxels.max(1);
        self
    }
}
