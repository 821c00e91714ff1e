//! Stop signal fan-out.

use std::future::Future;
use tokio::sync::broadcast;

/// One-shot stop signal shared by the gateway and admin accept loops.
///
/// Each accept loop holds a receiver from [`Shutdown::subscribe`]. Dropping
/// the `Shutdown` closes the channel, which the loops also treat as a stop.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one accept loop.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Loops that already stopped are not an error.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners left");
        }
    }

    /// Wait for `signal`, then fire.
    pub async fn trigger_on<F: Future<Output = ()>>(&self, signal: F) {
        signal.await;
        self.trigger();
    }

    /// Accept loops still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
