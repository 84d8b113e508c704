//! Progress reporting for deploy operations.
//!
//! A [`ProgressHandle`] is bound to exactly one logical operation and must be
//! finished exactly once across every exit path. Without a UI backend,
//! [`NullProgress`] degrades every call to a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Backend that renders progress for the current operation.
///
/// Only one operation reports at a time (deploys are single-flight), so the
/// backend carries no operation id.
pub trait ProgressBackend: Send + Sync {
    /// A new operation began.
    fn begin(&self, title: &str);

    /// Progress update for the running operation.
    fn update(&self, message: &str, percent: u8);

    /// The running operation reached a terminal state.
    fn end(&self);
}

/// Handle bound to one logical operation.
///
/// The handle latches on [`ProgressHandle::finish`]: the first call reaches
/// the backend, later calls and reports are dropped.
pub struct ProgressHandle {
    backend: Arc<dyn ProgressBackend>,
    finished: AtomicBool,
}

impl ProgressHandle {
    /// Announce a new operation and return its handle.
    pub fn begin(backend: Arc<dyn ProgressBackend>, title: &str) -> Self {
        backend.begin(title);
        Self {
            backend,
            finished: AtomicBool::new(false),
        }
    }

    /// Report a message and completion percentage.
    pub fn report(&self, message: &str, percent: u8) {
        if !self.finished.load(Ordering::Acquire) {
            self.backend.update(message, percent);
        }
    }

    /// Terminate the handle. Only the first call reaches the backend.
    pub fn finish(&self) {
        if self
            .finished
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.backend.end();
        }
    }

    /// Whether the handle was already finished.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }
}

/// No-op backend for headless use.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressBackend for NullProgress {
    fn begin(&self, _title: &str) {}
    fn update(&self, _message: &str, _percent: u8) {}
    fn end(&self) {}
}
