//! Tensor-batched trilinear interpolation on a burn backend.
//!
//! All indices of a batch are interpolated with a handful of tensor
//! operations: floor, weight computation, edge clamping and eight gathers.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};

use super::trait_::{check_bounds, Interpolator};
use crate::error::{DoseError, Result};
use crate::grid::VolumeView;
use crate::spatial::ContinuousIndex;

/// Tensor interpolator.
///
/// Precision follows the backend's float element; with `NdArray<f64>` the
/// results agree with [`super::LinearInterpolator`] to rounding. Bounds are
/// validated on the host before any tensor is built.
///
/// # Type Parameters
/// * `B` - The Burn backend
#[derive(Debug, Clone)]
pub struct TensorInterpolator<B: Backend> {
    device: B::Device,
}

impl<B: Backend> TensorInterpolator<B> {
    /// Create an interpolator that runs on `device`.
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    fn float_tensor(&self, values: Vec<f64>) -> Tensor<B, 1> {
        let len = values.len();
        Tensor::<B, 1>::from_data(TensorData::new(values, [len]), &self.device)
    }

    #[inline]
    fn gather_3d(
        flat_data: &Tensor<B, 1>,
        xi: &Tensor<B, 1, Int>,
        yi: &Tensor<B, 1, Int>,
        zi: &Tensor<B, 1, Int>,
        stride_y: i64,
        stride_z: i64,
    ) -> Tensor<B, 1> {
        let idx = zi.clone() * stride_z + yi.clone() * stride_y + xi.clone();
        flat_data.clone().gather(0, idx)
    }
}

impl<B: Backend> Default for TensorInterpolator<B> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl<B: Backend> Interpolator for TensorInterpolator<B> {
    fn name(&self) -> &'static str {
        "tensor"
    }

    fn interpolate(&self, volume: &VolumeView<'_>, indices: &[ContinuousIndex]) -> Result<Vec<f64>> {
        for index in indices {
            check_bounds(volume, index)?;
        }
        if indices.is_empty() {
            return Ok(Vec::new());
        }

        let [nx, ny, nz] = volume.extent();
        let batch_size = indices.len();

        // Storage is [Z, Y, X]; indices arrive as (x, y, z).
        let stride_z = (ny * nx) as i64;
        let stride_y = nx as i64;

        let flat_data = self.float_tensor(volume.data().iter().map(|&v| v as f64).collect());

        let x = self.float_tensor(indices.iter().map(|i| i[0]).collect());
        let y = self.float_tensor(indices.iter().map(|i| i[1]).collect());
        let z = self.float_tensor(indices.iter().map(|i| i[2]).collect());

        let x0 = x.clone().floor();
        let y0 = y.clone().floor();
        let z0 = z.clone().floor();

        let wx = x - x0.clone();
        let wy = y - y0.clone();
        let wz = z - z0.clone();

        // x1 = x0 + 1 replicated to x0 at the last sample.
        let x1_i = (x0.clone() + 1.0).clamp(0.0, (nx - 1) as f64).int();
        let y1_i = (y0.clone() + 1.0).clamp(0.0, (ny - 1) as f64).int();
        let z1_i = (z0.clone() + 1.0).clamp(0.0, (nz - 1) as f64).int();
        let x0_i = x0.int();
        let y0_i = y0.int();
        let z0_i = z0.int();

        let v000 = Self::gather_3d(&flat_data, &x0_i, &y0_i, &z0_i, stride_y, stride_z);
        let v001 = Self::gather_3d(&flat_data, &x0_i, &y0_i, &z1_i, stride_y, stride_z);
        let v010 = Self::gather_3d(&flat_data, &x0_i, &y1_i, &z0_i, stride_y, stride_z);
        let v011 = Self::gather_3d(&flat_data, &x0_i, &y1_i, &z1_i, stride_y, stride_z);
        let v100 = Self::gather_3d(&flat_data, &x1_i, &y0_i, &z0_i, stride_y, stride_z);
        let v101 = Self::gather_3d(&flat_data, &x1_i, &y0_i, &z1_i, stride_y, stride_z);
        let v110 = Self::gather_3d(&flat_data, &x1_i, &y1_i, &z0_i, stride_y, stride_z);
        let v111 = Self::gather_3d(&flat_data, &x1_i, &y1_i, &z1_i, stride_y, stride_z);

        let one = Tensor::<B, 1>::ones([batch_size], &self.device);
        let one_minus_wx = one.clone() - wx.clone();
        let one_minus_wy = one.clone() - wy.clone();
        let one_minus_wz = one - wz.clone();

        // Interpolate along X
        let c00 = v000 * one_minus_wx.clone() + v100 * wx.clone();
        let c01 = v001 * one_minus_wx.clone() + v101 * wx.clone();
        let c10 = v010 * one_minus_wx.clone() + v110 * wx.clone();
        let c11 = v011 * one_minus_wx + v111 * wx;

        // Interpolate along Y
        let c0 = c00 * one_minus_wy.clone() + c10 * wy.clone();
        let c1 = c01 * one_minus_wy + c11 * wy;

        // Interpolate along Z
        let result = c0 * one_minus_wz + c1 * wz;

        result
            .into_data()
            .convert::<f64>()
            .to_vec::<f64>()
            .map_err(|e| DoseError::backend(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::Point3;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f64>;

    #[test]
    fn test_tensor_interpolator_3d() {
        let data: Vec<u32> = vec![0, 1, 10, 11, 100, 101, 110, 111];
        let volume = VolumeView::new(&data, [2, 2, 2]).unwrap();
        let interpolator = TensorInterpolator::<TestBackend>::default();

        let indices = [
            Point3::new([0.0, 0.0, 0.0]),
            Point3::new([1.0, 0.0, 0.0]),
            Point3::new([0.0, 1.0, 0.0]),
            Point3::new([0.0, 0.0, 1.0]),
            Point3::new([0.5, 0.5, 0.5]),
        ];
        let result = interpolator.interpolate(&volume, &indices).unwrap();

        assert_eq!(result[0], 0.0);
        assert_eq!(result[1], 1.0);
        assert_eq!(result[2], 10.0);
        assert_eq!(result[3], 100.0);
        let expected = (0.0 + 1.0 + 10.0 + 11.0 + 100.0 + 101.0 + 110.0 + 111.0) / 8.0;
        assert!((result[4] - expected).abs() < 1e-9, "Expected {}, got {}", expected, result[4]);
    }

    #[test]
    fn test_tensor_interpolator_last_sample() {
        let data: Vec<u32> = (0..27).collect();
        let volume = VolumeView::new(&data, [3, 3, 3]).unwrap();
        let interpolator = TensorInterpolator::<TestBackend>::default();
        let result = interpolator
            .interpolate(&volume, &[Point3::new([2.0, 2.0, 2.0])])
            .unwrap();
        assert_eq!(result, vec![26.0]);
    }

    #[test]
    fn test_tensor_interpolator_rejects_out_of_bounds() {
        let data = vec![0u32; 8];
        let volume = VolumeView::new(&data, [2, 2, 2]).unwrap();
        let interpolator = TensorInterpolator::<TestBackend>::default();
        let result = interpolator.interpolate(&volume, &[Point3::new([1.5, 0.0, 1.0001])]);
        assert!(matches!(result, Err(DoseError::OutOfBounds { .. })));
    }

    #[test]
    fn test_tensor_interpolator_empty_batch() {
        let data = vec![0u32; 8];
        let volume = VolumeView::new(&data, [2, 2, 2]).unwrap();
        let interpolator = TensorInterpolator::<TestBackend>::default();
        assert!(interpolator.interpolate(&volume, &[]).unwrap().is_empty());
    }
}
