//! Dose grid combination.
//!
//! Sums two dose grids into a new grid whose scaling factor is the sum of
//! the input scaling factors. Coincident grids are summed element-wise;
//! otherwise both are trilinearly resampled onto the aligned lattice.

use std::sync::Arc;

use plansum_core::error::{DoseError, Result};
use plansum_core::grid::{AlignedLattice, BitDepth, DoseGrid};
use plansum_core::interpolation::Interpolator;

use crate::align::{Alignment, GridAligner};
use crate::config::CombineConfig;
use crate::progress::{CancellationToken, ProgressCallback, ProgressTracker};

/// Sum two dose grids with the default configuration.
///
/// `force_resample` takes the interpolation path even for coincident grids.
pub fn combine(old: &DoseGrid, new: &DoseGrid, force_resample: bool) -> Result<DoseGrid> {
    DoseCombiner::new(CombineConfig::new().with_force_resample(force_resample)).combine(old, new)
}

/// Dose combiner.
///
/// Inputs are borrowed read-only and the result is always a freshly
/// allocated grid. Callers are expected to have checked that both plans
/// refer to the same image series.
pub struct DoseCombiner {
    config: CombineConfig,
    interpolator: Box<dyn Interpolator>,
    tracker: ProgressTracker,
    cancellation: CancellationToken,
}

impl DoseCombiner {
    /// Create a combiner using the interpolator selected by `config.backend`.
    pub fn new(config: CombineConfig) -> Self {
        let interpolator = config.backend.build();
        Self {
            config,
            interpolator,
            tracker: ProgressTracker::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the configured interpolator.
    pub fn with_interpolator(mut self, interpolator: Box<dyn Interpolator>) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Register a progress callback for the resample pass.
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.tracker.add_callback(callback);
        self
    }

    /// Use `token` to cancel the resample pass between batches.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &CombineConfig {
        &self.config
    }

    /// Sum `old` and `new`.
    ///
    /// # Errors
    /// * [`DoseError::DegenerateGrid`] when no usable common lattice exists
    /// * [`DoseError::OutOfBounds`] when the aligned lattice reaches outside an input
    /// * [`DoseError::InvalidSample`] when a combined sample does not fit in u32
    /// * [`DoseError::Cancelled`] when the cancellation token fires
    pub fn combine(&self, old: &DoseGrid, new: &DoseGrid) -> Result<DoseGrid> {
        self.cancellation.check()?;

        let aligner = GridAligner::new(self.config.coincidence)
            .with_force_resample(self.config.force_resample);

        let (raw, geometry) = match aligner.align(old.geometry(), new.geometry())? {
            Alignment::Coincident => {
                tracing::info!("Using direct summation");
                (Self::direct_sum(old, new), old.geometry().clone())
            }
            Alignment::NeedsResample(lattice) => {
                tracing::info!(
                    "Using {} interpolation onto {}x{}x{} lattice",
                    self.interpolator.name(),
                    lattice.dimensions().columns,
                    lattice.dimensions().rows,
                    lattice.dimensions().frames
                );
                let raw = self.resampled_sum(old, new, &lattice)?;
                (raw, lattice.to_geometry()?)
            }
        };

        let scaling = old.scaling_factor() + new.scaling_factor();
        let samples = quantize(&raw, scaling)?;

        let mut combined = DoseGrid::new(samples, geometry, scaling)?.with_bit_depth(BitDepth::U32);
        if let Some(dose) = combined_prescription(old.prescribed_dose(), new.prescribed_dose()) {
            combined = combined.with_prescribed_dose(dose);
        }
        Ok(combined)
    }

    /// Element-wise `old * k_old + new * k_new` on a shared lattice.
    fn direct_sum(old: &DoseGrid, new: &DoseGrid) -> Vec<f64> {
        let k_old = old.scaling_factor();
        let k_new = new.scaling_factor();
        old.samples()
            .iter()
            .zip(new.samples())
            .map(|(&a, &b)| a as f64 * k_old + b as f64 * k_new)
            .collect()
    }

    /// Interpolate both grids on `lattice`, batch by batch.
    fn resampled_sum(
        &self,
        old: &DoseGrid,
        new: &DoseGrid,
        lattice: &AlignedLattice,
    ) -> Result<Vec<f64>> {
        let total = lattice.voxel_count();
        let batch_voxels = self.config.batch_voxels.max(1);
        let total_batches = total.div_ceil(batch_voxels);

        let mut run = self.tracker.start(total, total_batches);
        let result = self.resample_batches(old, new, lattice, batch_voxels, &mut |batch, done| {
            run.update(batch, done)
        });
        match result {
            Ok(raw) => {
                run.complete();
                Ok(raw)
            }
            Err(e) => {
                run.error(&e);
                Err(e)
            }
        }
    }

    fn resample_batches(
        &self,
        old: &DoseGrid,
        new: &DoseGrid,
        lattice: &AlignedLattice,
        batch_voxels: usize,
        report: &mut dyn FnMut(usize, usize),
    ) -> Result<Vec<f64>> {
        let total = lattice.voxel_count();
        let old_transform = old.geometry().index_transform()?;
        let new_transform = new.geometry().index_transform()?;
        let old_volume = old.volume();
        let new_volume = new.volume();
        let k_old = old.scaling_factor();
        let k_new = new.scaling_factor();

        let mut raw = Vec::with_capacity(total);
        for (batch, start) in (0..total).step_by(batch_voxels).enumerate() {
            self.cancellation.check()?;

            let end = (start + batch_voxels).min(total);
            let points = lattice.physical_points(start..end);

            let old_indices: Vec<_> = points
                .iter()
                .map(|p| old_transform.physical_to_index(p))
                .collect();
            let new_indices: Vec<_> = points
                .iter()
                .map(|p| new_transform.physical_to_index(p))
                .collect();

            let old_values = self.interpolator.interpolate(&old_volume, &old_indices)?;
            let new_values = self.interpolator.interpolate(&new_volume, &new_indices)?;

            raw.extend(
                old_values
                    .iter()
                    .zip(&new_values)
                    .map(|(a, b)| a * k_old + b * k_new),
            );
            tracing::trace!("Resampled voxels {}..{}", start, end);
            report(batch + 1, end);
        }
        Ok(raw)
    }
}

/// Convert physical dose sums to samples at `scaling`, truncating.
fn quantize(raw: &[f64], scaling: f64) -> Result<Vec<u32>> {
    raw.iter()
        .enumerate()
        .map(|(index, &dose)| {
            let value = (dose / scaling).floor();
            if !(value >= 0.0 && value <= u32::MAX as f64) {
                return Err(DoseError::InvalidSample { index, value });
            }
            Ok(value as u32)
        })
        .collect()
}

/// Sum when both are present, otherwise whichever exists.
fn combined_prescription(old: Option<f64>, new: Option<f64>) -> Option<f64> {
    match (old, new) {
        (Some(a), Some(b)) => Some(a + b),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_truncates() {
        let samples = quantize(&[0.0, 1.49, 1.5, 2.99], 0.5).unwrap();
        assert_eq!(samples, vec![0, 2, 3, 5]);
    }

    #[test]
    fn test_quantize_rejects_negative_and_nan() {
        assert!(matches!(
            quantize(&[1.0, -0.6], 0.5),
            Err(DoseError::InvalidSample { index: 1, .. })
        ));
        assert!(matches!(
            quantize(&[f64::NAN], 0.5),
            Err(DoseError::InvalidSample { index: 0, .. })
        ));
    }

    #[test]
    fn test_quantize_rejects_overflow() {
        let result = quantize(&[u32::MAX as f64 * 2.0], 1.0);
        assert!(matches!(result, Err(DoseError::InvalidSample { .. })));
    }

    #[test]
    fn test_combined_prescription() {
        assert_eq!(combined_prescription(Some(50.0), Some(10.0)), Some(60.0));
        assert_eq!(combined_prescription(Some(50.0), None), Some(50.0));
        assert_eq!(combined_prescription(None, Some(10.0)), Some(10.0));
        assert_eq!(combined_prescription(None, None), None);
    }
}
