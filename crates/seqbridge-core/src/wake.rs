//! Coalescing wake signal for the port worker.
//!
//! A one-slot channel acts as a binary semaphore: `post` fills the slot if it is
//! empty, `wait` blocks until the slot is full and empties it. Any number of
//! posts made before the waiter runs collapse into a single wake, so producers
//! must post after every write rather than only on state changes.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::Duration;

/// Create a connected waker / waiter pair.
pub fn wake_signal() -> (Waker, WakeWaiter) {
    let (tx, rx) = bounded(1);
    (Waker { tx }, WakeWaiter { rx })
}

/// Post side. Cheap to clone; never blocks.
#[derive(Clone, Debug)]
pub struct Waker {
    tx: Sender<()>,
}

impl Waker {
    /// RT-safe. Returns `false` only when the waiter is gone.
    #[inline]
    pub fn post(&self) -> bool {
        match self.tx.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }
}

/// Wait side, owned by the worker thread.
#[derive(Debug)]
pub struct WakeWaiter {
    rx: Receiver<()>,
}

impl WakeWaiter {
    /// Blocks until a post is pending and consumes it.
    ///
    /// Returns `false` once every [`Waker`] has been dropped and no post is
    /// pending; no further wake can ever arrive.
    pub fn wait(&self) -> bool {
        self.rx.recv().is_ok()
    }

    /// Like [`wait`](Self::wait), but gives up after `timeout`.
    ///
    /// A zero timeout consumes a pending post without blocking.
    pub fn wait_timeout(&self, timeout: Duration) -> WakeStatus {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => WakeStatus::Posted,
            Err(RecvTimeoutError::Timeout) => WakeStatus::TimedOut,
            Err(RecvTimeoutError::Disconnected) => WakeStatus::Disconnected,
        }
    }
}

/// Outcome of [`WakeWaiter::wait_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeStatus {
    Posted,
    TimedOut,
    /// Every [`Waker`] is gone and nothing is pending.
    Disconnected,
}
