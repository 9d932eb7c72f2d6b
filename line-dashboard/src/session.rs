//! Session lifecycle helpers: one-shot setup and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Runs setup code at most once per logical session, however many times
/// the lifecycle hook fires.
#[derive(Debug, Default, Clone)]
pub struct SessionGuard {
    started: Arc<AtomicBool>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `setup` on the first invocation only. Returns `None` when the
    /// session was already set up.
    pub fn run_once<T>(&self, setup: impl FnOnce() -> T) -> Option<T> {
        if self.started.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(setup())
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

/// Cloneable cancellation flag that async code can wait on.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // the sender lives in self, so the channel cannot close under us
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
