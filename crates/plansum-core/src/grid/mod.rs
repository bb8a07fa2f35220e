//! Dose grid types.
//!
//! This module provides the lattice geometry of a dose grid, the grid
//! itself with its sample buffer, a borrowed volume view for interpolation,
//! and the aligned output lattice used when two grids must be resampled.

pub mod geometry;
pub mod dose;
pub mod volume;
pub mod lattice;

pub use geometry::{GridDimensions, GridGeometry, IndexTransform};
pub use dose::{BitDepth, DoseGrid};
pub use volume::VolumeView;
pub use lattice::{voxel_position, AlignedLattice};
