//! Cancellation and termination signalling.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::types::{GatewayError, GatewayResult};

/// One-shot stop signal shared between a caller and in-flight work.
///
/// Serves two roles: the per-call cancellation context threaded into blocking
/// operations, and a subscription session's termination signal. Clones share
/// the underlying signal. Triggering is idempotent and sticky: work that
/// checks in after the trigger still observes it.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Raise the signal.
    pub fn trigger(&self) {
        // Flag first: a guard that subscribes after the broadcast was sent
        // still sees the trigger.
        self.triggered.store(true, Ordering::SeqCst);
        let _ = self.tx.send(());
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Subscribe to the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Number of receivers still listening (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Run `fut` to completion unless the signal fires first.
    pub async fn guard<F: Future>(&self, fut: F) -> GatewayResult<F::Output> {
        let mut stop = self.subscribe();
        if self.is_triggered() {
            return Err(GatewayError::Cancelled);
        }
        tokio::select! {
            _ = stop.recv() => Err(GatewayError::Cancelled),
            out = fut => Ok(out),
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
