//! Output lattice for resampled dose sums.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::geometry::{GridDimensions, GridGeometry, IndexTransform};
use crate::error::{DoseError, Result};
use crate::spatial::{Point3, Spacing3};

/// Voxel position `[column, row, frame]` of a flat frame-major offset.
///
/// Offsets enumerate columns fastest, then rows, then frames, the same
/// order in which samples are stored.
#[inline]
pub fn voxel_position(dimensions: GridDimensions, offset: usize) -> [usize; 3] {
    let plane = dimensions.columns * dimensions.rows;
    let frame = offset / plane;
    let within = offset % plane;
    [within % dimensions.columns, within / dimensions.columns, frame]
}

/// Geometry of the common lattice two grids are resampled onto.
///
/// Carries no voxel data. Spacing and dimensions are ordered
/// (x, y, z) = (columns, rows, frames).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedLattice {
    origin: Point3,
    spacing: Spacing3,
    dimensions: GridDimensions,
}

impl AlignedLattice {
    /// Create a lattice; every spacing component must be positive and every
    /// dimension non-zero.
    pub fn new(origin: Point3, spacing: Spacing3, dimensions: GridDimensions) -> Result<Self> {
        if !spacing.is_positive() {
            return Err(DoseError::degenerate(format!(
                "aligned spacing {:?} must be positive",
                spacing.to_array()
            )));
        }
        if dimensions.voxel_count() == 0 {
            return Err(DoseError::degenerate(format!(
                "aligned lattice {:?} is empty",
                dimensions
            )));
        }
        Ok(Self {
            origin,
            spacing,
            dimensions,
        })
    }

    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    pub fn spacing(&self) -> &Spacing3 {
        &self.spacing
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn voxel_count(&self) -> usize {
        self.dimensions.voxel_count()
    }

    /// z sample coordinates minus the z origin.
    pub fn frame_offsets(&self) -> Vec<f64> {
        let z0 = self.origin[2];
        (0..self.dimensions.frames)
            .map(|k| (k as f64 * self.spacing[2] + z0) - z0)
            .collect()
    }

    pub fn index_transform(&self) -> IndexTransform {
        IndexTransform::new(self.origin, self.spacing)
    }

    /// Physical coordinates of the voxels at flat offsets `range`.
    pub fn physical_points(&self, range: Range<usize>) -> Vec<Point3> {
        let transform = self.index_transform();
        range
            .map(|offset| {
                let [column, row, frame] = voxel_position(self.dimensions, offset);
                transform.index_to_physical(&Point3::new([
                    column as f64,
                    row as f64,
                    frame as f64,
                ]))
            })
            .collect()
    }

    /// Geometry describing a grid sampled on this lattice.
    pub fn to_geometry(&self) -> Result<GridGeometry> {
        GridGeometry::new(
            self.origin,
            [self.spacing[0], self.spacing[1]],
            self.frame_offsets(),
            self.dimensions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> AlignedLattice {
        AlignedLattice::new(
            Point3::new([-15.0, -20.0, -7.5]),
            Spacing3::new([5.0, 5.0, 2.5]),
            GridDimensions::new(3, 2, 4),
        )
        .unwrap()
    }

    #[test]
    fn test_voxel_position_order() {
        let dims = GridDimensions::new(3, 2, 4);
        assert_eq!(voxel_position(dims, 0), [0, 0, 0]);
        assert_eq!(voxel_position(dims, 2), [2, 0, 0]);
        assert_eq!(voxel_position(dims, 3), [0, 1, 0]);
        assert_eq!(voxel_position(dims, 6), [0, 0, 1]);
        assert_eq!(voxel_position(dims, 23), [2, 1, 3]);
    }

    #[test]
    fn test_physical_points() {
        let points = lattice().physical_points(0..24);
        assert_eq!(points.len(), 24);
        assert_eq!(points[0], Point3::new([-15.0, -20.0, -7.5]));
        assert_eq!(points[4], Point3::new([-10.0, -15.0, -7.5]));
        assert_eq!(points[23], Point3::new([-5.0, -15.0, 0.0]));
    }

    #[test]
    fn test_frame_offsets_and_geometry() {
        let lattice = lattice();
        assert_eq!(lattice.frame_offsets(), vec![0.0, 2.5, 5.0, 7.5]);
        let geometry = lattice.to_geometry().unwrap();
        assert_eq!(geometry.shape(), [4, 2, 3]);
        assert_eq!(geometry.spacing_xy(), [5.0, 5.0]);
        assert_eq!(geometry.frame_spacing(), Some(2.5));
    }

    #[test]
    fn test_rejects_empty_lattice() {
        let result = AlignedLattice::new(
            Point3::origin(),
            Spacing3::uniform(1.0),
            GridDimensions::new(0, 2, 2),
        );
        assert!(matches!(result, Err(DoseError::DegenerateGrid(_))));
    }
}
