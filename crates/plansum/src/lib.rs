//! Summation of radiotherapy dose grids.
//!
//! [`DoseCombiner`] asks [`GridAligner`] whether two grids share a lattice.
//! Coincident grids are summed element-wise; otherwise both are resampled
//! with a trilinear [`plansum_core::Interpolator`] onto the aligned lattice
//! and summed there.

pub mod align;
pub mod combine;
pub mod config;
pub mod progress;

pub use align::{Alignment, GridAligner};
pub use combine::{combine, DoseCombiner};
pub use config::{CoincidencePolicy, CombineConfig};
pub use plansum_core::error::{DoseError, Result};
pub use progress::{
    CancellationToken, HistoryCallback, LoggingProgressCallback, ProgressCallback, ProgressInfo,
    ProgressTracker,
};
