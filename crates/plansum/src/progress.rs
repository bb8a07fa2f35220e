//! Progress tracking and cooperative cancellation for resampling passes.
//!
//! A resample pass reports after every batch of output voxels and checks
//! its cancellation token before starting the next one.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use plansum_core::error::DoseError;

/// Progress information for one completed batch.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Number of completed batches.
    pub batch: usize,
    /// Total number of batches.
    pub total_batches: usize,
    /// Output voxels written so far.
    pub voxels_done: usize,
    /// Output voxels in the lattice.
    pub total_voxels: usize,
    /// Time elapsed since the pass started.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    /// Create new progress information.
    pub fn new(
        batch: usize,
        total_batches: usize,
        voxels_done: usize,
        total_voxels: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            batch,
            total_batches,
            voxels_done,
            total_voxels,
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Calculate progress percentage.
    pub fn progress_percent(&self) -> f64 {
        if self.total_voxels == 0 {
            return 100.0;
        }
        (self.voxels_done as f64 / self.total_voxels as f64) * 100.0
    }

    /// Calculate estimated remaining time.
    pub fn calculate_remaining(&mut self) {
        if self.voxels_done > 0 {
            let per_voxel = self.elapsed.as_secs_f64() / self.voxels_done as f64;
            let remaining = self.total_voxels.saturating_sub(self.voxels_done);
            self.estimated_remaining = Some(Duration::from_secs_f64(per_voxel * remaining as f64));
        }
    }
}

/// Progress callback trait for monitoring a resample pass.
pub trait ProgressCallback: Send + Sync {
    /// Called after each batch.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called when the pass starts.
    fn on_start(&self, _total_voxels: usize) {}

    /// Called when every output voxel has been written.
    fn on_complete(&self, _info: &ProgressInfo) {}

    /// Called when the pass fails or is cancelled.
    fn on_error(&self, _error: &DoseError) {}
}

/// Progress callback that logs to tracing.
#[derive(Debug, Clone)]
pub struct LoggingProgressCallback {
    /// Log every `log_interval` batches.
    pub log_interval: usize,
}

impl Default for LoggingProgressCallback {
    fn default() -> Self {
        Self { log_interval: 16 }
    }
}

impl LoggingProgressCallback {
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }
}

impl ProgressCallback for LoggingProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if info.batch % self.log_interval == 0 || info.batch == info.total_batches {
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());

            tracing::debug!(
                "Batch {}/{} ({:.1}%) | Voxels: {}/{} | Elapsed: {:.2}s | ETA: {}",
                info.batch,
                info.total_batches,
                info.progress_percent(),
                info.voxels_done,
                info.total_voxels,
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self, total_voxels: usize) {
        tracing::info!("Resampling {} output voxels", total_voxels);
    }

    fn on_complete(&self, info: &ProgressInfo) {
        tracing::info!(
            "Resampling completed in {:.2}s ({} voxels)",
            info.elapsed.as_secs_f64(),
            info.voxels_done
        );
    }

    fn on_error(&self, error: &DoseError) {
        tracing::error!("Resampling failed: {}", error);
    }
}

/// History callback that records all progress information.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
    errors: Arc<Mutex<Vec<DoseError>>>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded history.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get the recorded errors.
    pub fn get_errors(&self) -> Vec<DoseError> {
        self.errors.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(info.clone());
    }

    fn on_error(&self, error: &DoseError) {
        self.errors
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(error.clone());
    }
}

/// Shared flag for cooperative cancellation.
///
/// Clones observe the same flag; cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> Result<(), DoseError> {
        if self.is_cancelled() {
            Err(DoseError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Progress tracker that fans out to multiple callbacks.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    callbacks: Vec<Arc<dyn ProgressCallback>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback.
    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Start a pass over `total_voxels` voxels split into `total_batches`.
    pub fn start(&self, total_voxels: usize, total_batches: usize) -> ProgressRun<'_> {
        for callback in &self.callbacks {
            callback.on_start(total_voxels);
        }
        ProgressRun {
            tracker: self,
            start_time: Instant::now(),
            total_voxels,
            total_batches,
            last: ProgressInfo::new(0, total_batches, 0, total_voxels, Duration::ZERO),
        }
    }
}

/// A single tracked pass.
pub struct ProgressRun<'a> {
    tracker: &'a ProgressTracker,
    start_time: Instant,
    total_voxels: usize,
    total_batches: usize,
    last: ProgressInfo,
}

impl ProgressRun<'_> {
    /// Report a completed batch.
    pub fn update(&mut self, batch: usize, voxels_done: usize) {
        let mut info = ProgressInfo::new(
            batch,
            self.total_batches,
            voxels_done,
            self.total_voxels,
            self.start_time.elapsed(),
        );
        info.calculate_remaining();

        for callback in &self.tracker.callbacks {
            callback.on_progress(&info);
        }
        self.last = info;
    }

    /// Complete tracking.
    pub fn complete(self) {
        let mut info = self.last;
        info.elapsed = self.start_time.elapsed();
        info.estimated_remaining = Some(Duration::ZERO);
        for callback in &self.tracker.callbacks {
            callback.on_complete(&info);
        }
    }

    /// Report error.
    pub fn error(self, error: &DoseError) {
        for callback in &self.tracker.callbacks {
            callback.on_error(error);
        }
    }
}
