//! Single-shot idle timer for the recommendation scheduler.
//!
//! The timer is an owned, cancellable handle: each rearm cancels the
//! previous sleep and spawns a fresh one, and the fire signal is
//! delivered on an mpsc channel into the session's select loop. It runs
//! independently of the request lifecycle, so it MUST be cancelled on
//! session teardown -- otherwise the spawned sleep outlives the session
//! and fires into a dead channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Owned handle for the inactivity timer.
#[derive(Debug)]
pub struct IdleTimer {
    delay: Duration,
    tx: mpsc::Sender<()>,
    token: CancellationToken,
}

impl IdleTimer {
    /// Create the timer (disarmed) and the receiver its firings arrive on.
    pub fn new(delay: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        (
            Self {
                delay,
                tx,
                token: CancellationToken::new(),
            },
            rx,
        )
    }

    /// Arm the timer, cancelling any previous arming.
    ///
    /// Call on every qualifying user action; only the most recent arming
    /// can fire, and only once.
    pub fn rearm(&mut self) {
        self.token.cancel();
        self.token = CancellationToken::new();

        let token = self.token.clone();
        let tx = self.tx.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // Receiver gone means the session is being torn down.
                    let _ = tx.try_send(());
                }
            }
        });
    }

    /// Disarm without rearming. Required on session teardown.
    pub fn cancel(&mut self) {
        self.token.cancel();
    }
}

impl Drop for IdleTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
