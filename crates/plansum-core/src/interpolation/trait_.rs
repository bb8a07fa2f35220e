//! Interpolator trait for sampling dose volumes at continuous indices.

use crate::error::{DoseError, Result};
use crate::grid::VolumeView;
use crate::spatial::ContinuousIndex;

/// Interpolator trait for sampling a volume at fractional lattice positions.
///
/// Indices are ordered (column, row, frame) while the volume is stored
/// `[frames, rows, columns]`; implementations reconcile the two orders.
pub trait Interpolator {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Interpolate one value per index.
    ///
    /// # Arguments
    /// * `volume` - Source samples
    /// * `indices` - Continuous indices, each within `[0, extent - 1]` per axis
    ///
    /// # Errors
    /// [`DoseError::OutOfBounds`] if any index lies outside the volume; no
    /// sample is read in that case.
    fn interpolate(&self, volume: &VolumeView<'_>, indices: &[ContinuousIndex]) -> Result<Vec<f64>>;
}

/// Check that `index` lies within `[0, extent - 1]` on every axis.
///
/// NaN coordinates are rejected.
#[inline]
pub fn check_bounds(volume: &VolumeView<'_>, index: &ContinuousIndex) -> Result<()> {
    let extent = volume.extent();
    for axis in 0..3 {
        let upper = extent[axis] as f64 - 1.0;
        let value = index[axis];
        if !(value >= 0.0 && value <= upper) {
            return Err(DoseError::OutOfBounds {
                index: index.to_array(),
                shape: volume.shape(),
            });
        }
    }
    Ok(())
}

/// Edge-replicating trilinear blend; `index` must already be in bounds.
#[inline]
pub(crate) fn trilinear(volume: &VolumeView<'_>, index: &ContinuousIndex) -> f64 {
    let [nx, ny, nz] = volume.extent();

    let x0 = index[0].floor();
    let y0 = index[1].floor();
    let z0 = index[2].floor();
    let x = index[0] - x0;
    let y = index[1] - y0;
    let z = index[2] - z0;

    let x0 = x0 as usize;
    let y0 = y0 as usize;
    let z0 = z0 as usize;
    let x1 = if x0 + 1 >= nx { x0 } else { x0 + 1 };
    let y1 = if y0 + 1 >= ny { y0 } else { y0 + 1 };
    let z1 = if z0 + 1 >= nz { z0 } else { z0 + 1 };

    let data = volume.data();
    let v = |xi: usize, yi: usize, zi: usize| data[volume.offset(xi, yi, zi)] as f64;

    v(x0, y0, z0) * (1.0 - x) * (1.0 - y) * (1.0 - z)
        + v(x1, y0, z0) * x * (1.0 - y) * (1.0 - z)
        + v(x0, y1, z0) * (1.0 - x) * y * (1.0 - z)
        + v(x0, y0, z1) * (1.0 - x) * (1.0 - y) * z
        + v(x1, y0, z1) * x * (1.0 - y) * z
        + v(x0, y1, z1) * (1.0 - x) * y * z
        + v(x1, y1, z0) * x * y * (1.0 - z)
        + v(x1, y1, z1) * x * y * z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Point3;

    #[test]
    fn test_check_bounds() {
        let data = vec![0u32; 24];
        let volume = VolumeView::new(&data, [2, 3, 4]).unwrap();
        assert!(check_bounds(&volume, &Point3::new([0.0, 0.0, 0.0])).is_ok());
        assert!(check_bounds(&volume, &Point3::new([3.0, 2.0, 1.0])).is_ok());
        assert!(check_bounds(&volume, &Point3::new([3.0001, 0.0, 0.0])).is_err());
        assert!(check_bounds(&volume, &Point3::new([0.0, -1e-9, 0.0])).is_err());
        assert!(check_bounds(&volume, &Point3::new([0.0, 0.0, f64::NAN])).is_err());
    }
}
