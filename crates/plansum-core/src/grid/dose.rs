//! Dose grid: voxel samples plus lattice geometry and scaling.

use serde::{Deserialize, Serialize};

use super::geometry::GridGeometry;
use super::volume::VolumeView;
use crate::error::{DoseError, Result};

/// Pixel bit-depth description carried alongside the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitDepth {
    pub allocated: u16,
    pub stored: u16,
    pub high_bit: u16,
}

impl BitDepth {
    /// Unsigned 32-bit samples.
    pub const U32: BitDepth = BitDepth {
        allocated: 32,
        stored: 32,
        high_bit: 31,
    };

    /// Unsigned 16-bit samples.
    pub const U16: BitDepth = BitDepth {
        allocated: 16,
        stored: 16,
        high_bit: 15,
    };
}

impl Default for BitDepth {
    fn default() -> Self {
        Self::U32
    }
}

/// Volumetric dose distribution.
///
/// Samples are non-negative integers stored frame-major as
/// `[frames, rows, columns]`; the physical dose at a voxel is the sample
/// multiplied by `scaling_factor`.
///
/// # Examples
/// ```rust
/// use plansum_core::grid::{DoseGrid, GridDimensions, GridGeometry};
/// use plansum_core::spatial::Point3;
///
/// let geometry = GridGeometry::new(
///     Point3::new([0.0, 0.0, 0.0]),
///     [2.0, 2.0],
///     vec![0.0, 2.0],
///     GridDimensions::new(2, 2, 2),
/// ).unwrap();
/// let grid = DoseGrid::new(vec![10; 8], geometry, 0.5).unwrap();
/// assert_eq!(grid.dose_at(1, 1, 1), Some(5.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DoseGrid {
    samples: Vec<u32>,
    geometry: GridGeometry,
    scaling_factor: f64,
    prescribed_dose: Option<f64>,
    bit_depth: BitDepth,
}

impl DoseGrid {
    /// Create a dose grid, validating the buffer against the geometry.
    pub fn new(samples: Vec<u32>, geometry: GridGeometry, scaling_factor: f64) -> Result<Self> {
        if samples.len() != geometry.voxel_count() {
            return Err(DoseError::ShapeMismatch {
                expected: geometry.shape().to_vec(),
                actual: vec![samples.len()],
            });
        }
        if !scaling_factor.is_finite() || scaling_factor <= 0.0 {
            return Err(DoseError::InvalidScaling(scaling_factor));
        }

        Ok(Self {
            samples,
            geometry,
            scaling_factor,
            prescribed_dose: None,
            bit_depth: BitDepth::default(),
        })
    }

    /// Attach a prescribed dose.
    pub fn with_prescribed_dose(mut self, dose: f64) -> Self {
        self.prescribed_dose = Some(dose);
        self
    }

    /// Set the bit-depth description reported by the loader.
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    pub fn samples(&self) -> &[u32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u32> {
        self.samples
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn prescribed_dose(&self) -> Option<f64> {
        self.prescribed_dose
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Storage order shape `[frames, rows, columns]`.
    pub fn shape(&self) -> [usize; 3] {
        self.geometry.shape()
    }

    /// Borrowed view for interpolation.
    pub fn volume(&self) -> VolumeView<'_> {
        VolumeView::from_validated(&self.samples, self.geometry.shape())
    }

    /// Raw sample at `(frame, row, column)`.
    pub fn sample(&self, frame: usize, row: usize, column: usize) -> Option<u32> {
        self.volume().get(column, row, frame)
    }

    /// Physical dose at `(frame, row, column)`.
    pub fn dose_at(&self, frame: usize, row: usize, column: usize) -> Option<f64> {
        self.sample(frame, row, column)
            .map(|s| s as f64 * self.scaling_factor)
    }
}
