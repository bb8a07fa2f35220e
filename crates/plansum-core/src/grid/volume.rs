//! Borrowed view of a voxel buffer.

use crate::error::{DoseError, Result};

/// Read-only view of samples stored frame-major as `[frames, rows, columns]`.
///
/// Interpolators read through this view; it never owns the buffer.
#[derive(Debug, Clone, Copy)]
pub struct VolumeView<'a> {
    data: &'a [u32],
    shape: [usize; 3],
}

impl<'a> VolumeView<'a> {
    /// Wrap a buffer, checking that its length matches `shape`.
    pub fn new(data: &'a [u32], shape: [usize; 3]) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(DoseError::ShapeMismatch {
                expected: shape.to_vec(),
                actual: vec![data.len()],
            });
        }
        Ok(Self { data, shape })
    }

    /// Wrap a buffer whose length is already known to match `shape`.
    pub(crate) fn from_validated(data: &'a [u32], shape: [usize; 3]) -> Self {
        debug_assert_eq!(data.len(), shape.iter().product::<usize>());
        Self { data, shape }
    }

    /// Shape as `[frames, rows, columns]`.
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Extent along `[x, y, z]` = `[columns, rows, frames]`.
    pub fn extent(&self) -> [usize; 3] {
        [self.shape[2], self.shape[1], self.shape[0]]
    }

    pub fn data(&self) -> &'a [u32] {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat offset of voxel `(column, row, frame)`.
    #[inline]
    pub fn offset(&self, column: usize, row: usize, frame: usize) -> usize {
        (frame * self.shape[1] + row) * self.shape[2] + column
    }

    /// Sample at `(column, row, frame)`, or `None` outside the volume.
    #[inline]
    pub fn get(&self, column: usize, row: usize, frame: usize) -> Option<u32> {
        if column >= self.shape[2] || row >= self.shape[1] || frame >= self.shape[0] {
            return None;
        }
        self.data.get(self.offset(column, row, frame)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_indexing() {
        let data: Vec<u32> = (0..24).collect();
        let volume = VolumeView::new(&data, [2, 3, 4]).unwrap();
        assert_eq!(volume.extent(), [4, 3, 2]);
        assert_eq!(volume.get(0, 0, 0), Some(0));
        assert_eq!(volume.get(3, 0, 0), Some(3));
        assert_eq!(volume.get(0, 1, 0), Some(4));
        assert_eq!(volume.get(0, 0, 1), Some(12));
        assert_eq!(volume.get(3, 2, 1), Some(23));
        assert_eq!(volume.get(4, 0, 0), None);
    }

    #[test]
    fn test_volume_shape_mismatch() {
        let data = vec![0u32; 23];
        let result = VolumeView::new(&data, [2, 3, 4]);
        assert!(matches!(result, Err(DoseError::ShapeMismatch { .. })));
    }
}
