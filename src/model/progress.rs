//! Cooperative cancellation and progress reporting
//!
//! Long passes (rebuilds, filter pre-passes) run on the caller's thread and
//! poll a shared token once per record; the interface stays responsive by
//! cancelling from a clone of the token it handed in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, polled once per record during a rebuild
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the running pass stops at its next poll
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Receives one heartbeat per record during long passes
pub trait ProgressSink {
    fn heartbeat(&mut self, done: usize, total: usize);
}

/// Sink that ignores every heartbeat
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn heartbeat(&mut self, _done: usize, _total: usize) {}
}

/// Sink invoking a callback every `interval` heartbeats
pub struct IntervalProgress<F: FnMut(usize, usize)> {
    interval: usize,
    callback: F,
}

impl<F: FnMut(usize, usize)> IntervalProgress<F> {
    pub fn new(interval: usize, callback: F) -> Self {
        Self {
            interval: interval.max(1),
            callback,
        }
    }
}

impl<F: FnMut(usize, usize)> ProgressSink for IntervalProgress<F> {
    fn heartbeat(&mut self, done: usize, total: usize) {
        if done % self.interval == 0 {
            (self.callback)(done, total);
        }
    }
}

/// How a rebuild finished. A cancelled rebuild is a normal outcome:
/// already-inserted rows stay, observable as `displayed() < total()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    Completed,
    Cancelled,
}

impl RebuildOutcome {
    pub fn was_cancelled(&self) -> bool {
        matches!(self, RebuildOutcome::Cancelled)
    }
}
