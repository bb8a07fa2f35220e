//! Core types for summing radiotherapy dose grids.
//!
//! Provides the lattice geometry of a dose grid, the grid container, the
//! error taxonomy, and the trilinear interpolation backends used to
//! resample a grid onto another lattice.

pub mod error;
pub mod spatial;
pub mod grid;
pub mod interpolation;

pub use error::{DoseError, Result};
pub use grid::{AlignedLattice, BitDepth, DoseGrid, GridDimensions, GridGeometry};
pub use interpolation::{InterpolationBackend, Interpolator};
pub use spatial::{ContinuousIndex, Point3, Spacing3, Vector3};
