//! Transfer progress snapshots and dispatch to a caller-supplied sink.
//!
//! Used by the transfer loop while bytes move, not by the verifiers.
//! Consumers get percent complete (or an indeterminate sentinel), the
//! transfer rate, and an ETA, plus the file's position within a
//! multi-file batch.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Position of one file within a multi-file operation, carried into every
/// snapshot so sinks can render e.g. "file 3 of 10". For single-file
/// transfers the default zero values apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchContext {
    pub file_index: usize,
    pub file_count: usize,
}

/// Snapshot of transfer progress for one file.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Percent complete in [0, 100], or -1.0 when the total size is
    /// unknown (indeterminate transfer).
    pub percent: f64,
    /// Transfer rate in bytes per second (0 if no time has elapsed).
    pub bytes_per_sec: f64,
    /// Estimated seconds remaining (None if indeterminate or rate is 0).
    pub eta_secs: Option<f64>,
    /// Bytes transferred so far.
    pub position: u64,
    /// Local side of the transfer.
    pub local_path: PathBuf,
    /// Remote side of the transfer.
    pub remote_path: String,
    /// Index of this file within the current batch.
    pub file_index: usize,
    /// Number of files in the current batch.
    pub file_count: usize,
}

impl TransferProgress {
    /// Build a snapshot from raw transfer counters. A `file_size` of 0
    /// means the total is unknown and yields the -1.0 percent sentinel.
    pub fn generate(
        file_size: u64,
        position: u64,
        bytes_processed: u64,
        elapsed: Duration,
        local_path: &Path,
        remote_path: &str,
        batch: &BatchContext,
    ) -> Self {
        let secs = elapsed.as_secs_f64();
        let bytes_per_sec = if secs > 0.0 {
            bytes_processed as f64 / secs
        } else {
            0.0
        };
        let percent = if file_size == 0 {
            -1.0
        } else {
            (position as f64 / file_size as f64 * 100.0).min(100.0)
        };
        let eta_secs = if file_size == 0 || bytes_per_sec <= 0.0 {
            None
        } else {
            Some(file_size.saturating_sub(position) as f64 / bytes_per_sec)
        };
        Self {
            percent,
            bytes_per_sec,
            eta_secs,
            position,
            local_path: local_path.to_owned(),
            remote_path: remote_path.to_string(),
            file_index: batch.file_index,
            file_count: batch.file_count,
        }
    }
}

/// Receiver of progress snapshots. Observer objects implement it
/// directly; plain closures get it through the blanket impl, and both
/// see the identical payload.
pub trait ProgressSink {
    fn accept(&mut self, progress: TransferProgress);
}

impl<F: FnMut(TransferProgress)> ProgressSink for F {
    fn accept(&mut self, progress: TransferProgress) {
        self(progress)
    }
}

/// Compute a snapshot from the current counters and hand it to `sink`.
///
/// Dispatch is synchronous and unbuffered; a sink that panics propagates
/// straight to the transfer loop, which owns failure handling.
pub fn report_progress<S: ProgressSink + ?Sized>(
    sink: &mut S,
    file_size: u64,
    position: u64,
    bytes_processed: u64,
    elapsed: Duration,
    local_path: &Path,
    remote_path: &str,
    batch: &BatchContext,
) {
    let snapshot = TransferProgress::generate(
        file_size,
        position,
        bytes_processed,
        elapsed,
        local_path,
        remote_path,
        batch,
    );
    sink.accept(snapshot);
}
