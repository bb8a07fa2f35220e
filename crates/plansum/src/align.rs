//! Grid alignment.
//!
//! Decides whether two dose grids share a lattice and, when they do not,
//! computes the common lattice both are resampled onto.

use plansum_core::error::{DoseError, Result};
use plansum_core::grid::{AlignedLattice, GridDimensions, GridGeometry};
use plansum_core::spatial::Point3;

use crate::config::CoincidencePolicy;

const AXES: [&str; 3] = ["x", "y", "z"];

/// Frame offsets closer than this to the derived spacing count as uniform.
const FRAME_UNIFORMITY_TOLERANCE: f64 = 1e-6;

/// Outcome of aligning two geometries.
#[derive(Debug, Clone, PartialEq)]
pub enum Alignment {
    /// Same lattice; samples can be summed element-wise.
    Coincident,
    /// Both grids must be interpolated onto this lattice.
    NeedsResample(AlignedLattice),
}

/// Grid aligner.
///
/// The resample lattice takes the coarser spacing of the two grids on each
/// axis. Its bounds are chosen per axis from the two grids' extents by
/// keeping the candidate nearest to zero (the coordinate origin, usually
/// the treatment isocenter). This equals the geometric intersection when
/// the overlap straddles zero; otherwise it may reach outside one of the
/// grids, which then surfaces as an out-of-bounds interpolation error.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridAligner {
    policy: CoincidencePolicy,
    force_resample: bool,
}

impl GridAligner {
    pub fn new(policy: CoincidencePolicy) -> Self {
        Self {
            policy,
            force_resample: false,
        }
    }

    /// Never report grids as coincident.
    pub fn with_force_resample(mut self, force: bool) -> Self {
        self.force_resample = force;
        self
    }

    /// Whether `a` and `b` describe the same lattice under the policy.
    pub fn is_coincident(&self, a: &GridGeometry, b: &GridGeometry) -> bool {
        if a.dimensions() != b.dimensions() {
            return false;
        }
        match self.policy {
            CoincidencePolicy::Exact => {
                a.origin() == b.origin()
                    && a.spacing_xy() == b.spacing_xy()
                    && a.frame_offsets() == b.frame_offsets()
            }
            CoincidencePolicy::Tolerance(tolerance) => {
                let close = |x: f64, y: f64| (x - y).abs() <= tolerance;
                (0..3).all(|axis| close(a.origin()[axis], b.origin()[axis]))
                    && (0..2).all(|axis| close(a.spacing_xy()[axis], b.spacing_xy()[axis]))
                    && a
                        .frame_offsets()
                        .iter()
                        .zip(b.frame_offsets())
                        .all(|(x, y)| close(*x, *y))
            }
        }
    }

    /// Decide between direct summation and resampling.
    pub fn align(&self, a: &GridGeometry, b: &GridGeometry) -> Result<Alignment> {
        if !self.force_resample && self.is_coincident(a, b) {
            return Ok(Alignment::Coincident);
        }
        Self::aligned_lattice(a, b).map(Alignment::NeedsResample)
    }

    /// Compute the common lattice of two geometries.
    ///
    /// # Errors
    /// [`DoseError::DegenerateGrid`] if a spacing is undefined or not
    /// positive, or if the selected bounds are empty or inverted on any axis.
    pub fn aligned_lattice(a: &GridGeometry, b: &GridGeometry) -> Result<AlignedLattice> {
        for geometry in [a, b] {
            if !geometry.has_uniform_frames(FRAME_UNIFORMITY_TOLERANCE) {
                tracing::warn!(
                    "Frame offsets are not uniformly spaced; using derived spacing {:?}",
                    geometry.frame_spacing()
                );
            }
        }

        let spacing = a.spacing()?.sup(&b.spacing()?);
        if !spacing.is_positive() {
            return Err(DoseError::degenerate(format!(
                "aligned spacing {:?} must be positive",
                spacing.to_array()
            )));
        }

        let lower_a = a.lower_extent();
        let lower_b = b.lower_extent();
        let upper_a = a.upper_extent()?;
        let upper_b = b.upper_extent()?;

        let mut lower = [0.0; 3];
        let mut counts = [0usize; 3];
        for axis in 0..3 {
            let low = closest_to_zero(lower_a[axis], lower_b[axis]);
            let high = closest_to_zero(upper_a[axis], upper_b[axis]);
            if !(high > low) {
                return Err(DoseError::degenerate(format!(
                    "empty or inverted overlap on {} axis: lower {}, upper {}",
                    AXES[axis], low, high
                )));
            }

            let count = ((high - low) / spacing[axis]).floor();
            if count < 1.0 {
                return Err(DoseError::degenerate(format!(
                    "overlap on {} axis ({}) is narrower than spacing {}",
                    AXES[axis],
                    high - low,
                    spacing[axis]
                )));
            }
            lower[axis] = low;
            counts[axis] = count as usize;
        }

        let lattice = AlignedLattice::new(
            Point3::new(lower),
            spacing,
            GridDimensions::new(counts[0], counts[1], counts[2]),
        )?;
        tracing::debug!(
            "Aligned lattice: origin {:?}, spacing {:?}, dimensions {:?}",
            lattice.origin().to_array(),
            lattice.spacing().to_array(),
            lattice.dimensions()
        );
        Ok(lattice)
    }
}

/// The candidate with the smallest magnitude; ties keep `first`.
fn closest_to_zero(first: f64, second: f64) -> f64 {
    if second.abs() < first.abs() {
        second
    } else {
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plansum_core::spatial::Spacing3;

    fn geometry(origin: [f64; 3], spacing: [f64; 3], dims: [usize; 3]) -> GridGeometry {
        let offsets = (0..dims[2]).map(|k| k as f64 * spacing[2]).collect();
        GridGeometry::new(
            Point3::new(origin),
            [spacing[0], spacing[1]],
            offsets,
            GridDimensions::new(dims[0], dims[1], dims[2]),
        )
        .unwrap()
    }

    #[test]
    fn test_closest_to_zero() {
        assert_eq!(closest_to_zero(-15.0, -25.0), -15.0);
        assert_eq!(closest_to_zero(10.0, -3.0), -3.0);
        assert_eq!(closest_to_zero(-4.0, 4.0), -4.0);
    }

    #[test]
    fn test_identical_grids_are_coincident() {
        let a = geometry([-10.0, -10.0, -5.0], [2.0, 2.0, 2.5], [10, 10, 4]);
        let aligner = GridAligner::default();
        assert_eq!(aligner.align(&a, &a.clone()).unwrap(), Alignment::Coincident);
    }

    #[test]
    fn test_exact_policy_rejects_tiny_offset() {
        let a = geometry([-10.0, -10.0, -5.0], [2.0, 2.0, 2.5], [10, 10, 4]);
        let b = geometry([-10.0 + 1e-9, -10.0, -5.0], [2.0, 2.0, 2.5], [10, 10, 4]);
        assert!(!GridAligner::default().is_coincident(&a, &b));
        assert!(GridAligner::new(CoincidencePolicy::Tolerance(1e-6)).is_coincident(&a, &b));
    }

    #[test]
    fn test_forced_resample() {
        let a = geometry([-10.0, -10.0, -5.0], [2.0, 2.0, 2.5], [10, 10, 4]);
        let aligner = GridAligner::default().with_force_resample(true);
        match aligner.align(&a, &a).unwrap() {
            Alignment::NeedsResample(lattice) => {
                assert_eq!(lattice.origin(), a.origin());
                assert_eq!(lattice.dimensions(), a.dimensions());
                assert_eq!(*lattice.spacing(), Spacing3::new([2.0, 2.0, 2.5]));
            }
            Alignment::Coincident => panic!("expected resampling"),
        }
    }

    #[test]
    fn test_lattice_uses_coarsest_spacing_and_nearest_bounds() {
        let a = geometry([-15.44, -20.44, -10.0], [2.5, 2.5, 2.5], [17, 21, 10]);
        let b = geometry([-25.0, -30.0, -7.5], [5.0, 5.0, 5.0], [12, 14, 4]);
        let lattice = GridAligner::aligned_lattice(&a, &b).unwrap();

        assert_eq!(*lattice.spacing(), Spacing3::new([5.0, 5.0, 5.0]));
        assert_eq!(lattice.origin(), &Point3::new([-15.44, -20.44, -7.5]));
        assert_eq!(lattice.dimensions(), GridDimensions::new(8, 10, 4));
    }

    #[test]
    fn test_inverted_overlap_is_degenerate() {
        let a = geometry([8.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2, 4, 4]);
        let b = geometry([-9.0, 0.0, 0.0], [1.0, 1.0, 1.0], [11, 4, 4]);
        let result = GridAligner::aligned_lattice(&a, &b);
        assert!(matches!(result, Err(DoseError::DegenerateGrid(_))));
    }

    #[test]
    fn test_narrow_overlap_is_degenerate() {
        let a = geometry([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [4, 4, 4]);
        let b = geometry([3.5, 0.0, 0.0], [2.0, 1.0, 1.0], [4, 4, 4]);
        // x overlap [0, 1) is narrower than the 2.0 aligned spacing.
        let a_narrow = geometry([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1, 4, 4]);
        assert!(GridAligner::aligned_lattice(&a, &b).is_ok());
        let result = GridAligner::aligned_lattice(&a_narrow, &b);
        assert!(matches!(result, Err(DoseError::DegenerateGrid(_))));
    }

    #[test]
    fn test_single_frame_cannot_be_resampled() {
        let a = geometry([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [4, 4, 1]);
        let b = geometry([1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [4, 4, 1]);
        let result = GridAligner::default().align(&a, &b);
        assert!(matches!(result, Err(DoseError::DegenerateGrid(_))));
    }
}
