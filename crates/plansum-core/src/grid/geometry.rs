//! Lattice geometry of a dose grid.

use serde::{Deserialize, Serialize};

use crate::error::{DoseError, Result};
use crate::spatial::{ContinuousIndex, Point3, Spacing3};

/// Lattice extent as (columns, rows, frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    pub columns: usize,
    pub rows: usize,
    pub frames: usize,
}

impl GridDimensions {
    pub fn new(columns: usize, rows: usize, frames: usize) -> Self {
        Self { columns, rows, frames }
    }

    /// Storage order shape `[frames, rows, columns]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.frames, self.rows, self.columns]
    }

    /// Extent along physical axes `[x, y, z]`.
    pub fn extent(&self) -> [usize; 3] {
        [self.columns, self.rows, self.frames]
    }

    pub fn voxel_count(&self) -> usize {
        self.columns * self.rows * self.frames
    }
}

/// Spatial lattice of a dose grid.
///
/// Axes are orthogonal and aligned with patient x, y, z. In-plane spacing is
/// given per column and per row; the frame spacing is derived from the first
/// two frame offsets. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryRecord")]
pub struct GridGeometry {
    origin: Point3,
    spacing_xy: [f64; 2],
    frame_offsets: Vec<f64>,
    dimensions: GridDimensions,
}

#[derive(Deserialize)]
struct GeometryRecord {
    origin: Point3,
    spacing_xy: [f64; 2],
    frame_offsets: Vec<f64>,
    dimensions: GridDimensions,
}

impl TryFrom<GeometryRecord> for GridGeometry {
    type Error = DoseError;

    fn try_from(record: GeometryRecord) -> Result<Self> {
        GridGeometry::new(
            record.origin,
            record.spacing_xy,
            record.frame_offsets,
            record.dimensions,
        )
    }
}

impl GridGeometry {
    /// Create a validated geometry.
    ///
    /// # Arguments
    /// * `origin` - Physical position of voxel (0, 0, 0)
    /// * `spacing_xy` - Column and row spacing, both strictly positive
    /// * `frame_offsets` - Strictly increasing z offsets from `origin.z`, one per frame
    /// * `dimensions` - Columns, rows and frames, all non-zero
    pub fn new(
        origin: Point3,
        spacing_xy: [f64; 2],
        frame_offsets: Vec<f64>,
        dimensions: GridDimensions,
    ) -> Result<Self> {
        if !origin.is_finite() {
            return Err(DoseError::invalid_geometry(format!(
                "origin {:?} is not finite",
                origin.to_array()
            )));
        }
        if spacing_xy.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(DoseError::invalid_geometry(format!(
                "pixel spacing {:?} must be positive",
                spacing_xy
            )));
        }
        if dimensions.voxel_count() == 0 {
            return Err(DoseError::invalid_geometry(format!(
                "dimensions {:?} must be non-zero",
                dimensions
            )));
        }
        if frame_offsets.len() != dimensions.frames {
            return Err(DoseError::invalid_geometry(format!(
                "{} frame offsets for {} frames",
                frame_offsets.len(),
                dimensions.frames
            )));
        }
        if frame_offsets.iter().any(|o| !o.is_finite()) {
            return Err(DoseError::invalid_geometry("frame offsets must be finite"));
        }
        if frame_offsets.windows(2).any(|w| w[1] <= w[0]) {
            return Err(DoseError::invalid_geometry(
                "frame offsets must be strictly increasing",
            ));
        }

        Ok(Self {
            origin,
            spacing_xy,
            frame_offsets,
            dimensions,
        })
    }

    /// Physical position of voxel (0, 0, 0).
    pub fn origin(&self) -> &Point3 {
        &self.origin
    }

    /// Column and row spacing.
    pub fn spacing_xy(&self) -> [f64; 2] {
        self.spacing_xy
    }

    pub fn frame_offsets(&self) -> &[f64] {
        &self.frame_offsets
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Storage order shape `[frames, rows, columns]`.
    pub fn shape(&self) -> [usize; 3] {
        self.dimensions.shape()
    }

    pub fn voxel_count(&self) -> usize {
        self.dimensions.voxel_count()
    }

    /// Frame spacing derived from the first two offsets; `None` for a
    /// single-frame grid.
    pub fn frame_spacing(&self) -> Option<f64> {
        match self.frame_offsets.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }

    /// Whether all consecutive frame offsets differ by the derived spacing
    /// within `tolerance`.
    pub fn has_uniform_frames(&self, tolerance: f64) -> bool {
        match self.frame_spacing() {
            Some(dz) => self
                .frame_offsets
                .windows(2)
                .all(|w| ((w[1] - w[0]) - dz).abs() <= tolerance),
            None => true,
        }
    }

    /// Per-axis spacing (x: columns, y: rows, z: frames).
    pub fn spacing(&self) -> Result<Spacing3> {
        let dz = self.frame_spacing().ok_or_else(|| {
            DoseError::degenerate("frame spacing is undefined for a single-frame grid")
        })?;
        let spacing = Spacing3::new([self.spacing_xy[0], self.spacing_xy[1], dz]);
        if !spacing.is_positive() {
            return Err(DoseError::degenerate(format!(
                "spacing {:?} must be positive on every axis",
                spacing.to_array()
            )));
        }
        Ok(spacing)
    }

    /// Minimum physical extent per axis, i.e. the origin.
    pub fn lower_extent(&self) -> Point3 {
        self.origin
    }

    /// Maximum physical extent per axis: `origin + spacing * count`.
    pub fn upper_extent(&self) -> Result<Point3> {
        let spacing = self.spacing()?;
        let extent = self.dimensions.extent();
        Ok(Point3::new(std::array::from_fn(|axis| {
            self.origin[axis] + spacing[axis] * extent[axis] as f64
        })))
    }

    /// Mapping between physical space and this grid's index space.
    pub fn index_transform(&self) -> Result<IndexTransform> {
        Ok(IndexTransform::new(self.origin, self.spacing()?))
    }
}

/// Axis-aligned mapping between physical points and continuous indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexTransform {
    origin: Point3,
    spacing: Spacing3,
}

impl IndexTransform {
    pub fn new(origin: Point3, spacing: Spacing3) -> Self {
        Self { origin, spacing }
    }

    /// `index = (point - origin) / spacing`
    pub fn physical_to_index(&self, point: &Point3) -> ContinuousIndex {
        let scaled = (*point - self.origin).component_div(&self.spacing);
        Point3::new(scaled.to_array())
    }

    /// `point = index * spacing + origin`
    pub fn index_to_physical(&self, index: &ContinuousIndex) -> Point3 {
        Point3::new(std::array::from_fn(|axis| {
            index[axis] * self.spacing[axis] + self.origin[axis]
        }))
    }
}
