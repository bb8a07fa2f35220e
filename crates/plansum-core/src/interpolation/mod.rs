//! Trilinear interpolation of dose volumes.
//!
//! This module defines the interpolation contract and its backends. Every
//! backend evaluates the same edge-replicating trilinear blend and rejects
//! coordinates outside the source lattice before reading any sample.

pub mod trait_;
pub mod linear;
pub mod parallel;
pub mod tensor;
pub mod backend;

pub use trait_::{check_bounds, Interpolator};
pub use linear::LinearInterpolator;
pub use parallel::ParallelInterpolator;
pub use tensor::TensorInterpolator;
pub use backend::InterpolationBackend;
