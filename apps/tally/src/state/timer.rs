//! Tokio-backed [`Timer`].
//!
//! Each deferred task gets its own sleeping tokio task, which sends the
//! `Deferred` back over an unbounded channel when it wakes. The command loop
//! owns the receiving end and feeds what arrives to `on_timer`, so the
//! continuation runs on the loop, never on the sleeping task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tally_core::{Deferred, Timer};
use tokio::sync::mpsc;
use tracing::trace;

pub struct TokioTimer {
    tx: mpsc::UnboundedSender<Deferred>,
    in_flight: Arc<AtomicUsize>,
}

/// The loop's side of a `TokioTimer`: fired tasks and how many are still
/// sleeping.
pub struct TimerHandle {
    rx: mpsc::UnboundedReceiver<Deferred>,
    in_flight: Arc<AtomicUsize>,
}

impl TokioTimer {
    pub fn channel() -> (TokioTimer, TimerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let in_flight = Arc::new(AtomicUsize::new(0));
        (
            TokioTimer {
                tx,
                in_flight: Arc::clone(&in_flight),
            },
            TimerHandle { rx, in_flight },
        )
    }
}

impl Timer for TokioTimer {
    /// Must be called from within a tokio runtime.
    fn defer(&mut self, delay: Duration, task: Deferred) {
        trace!(?task, ?delay, "Deferring");
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The loop may already be gone on shutdown
            let _ = tx.send(task);
        });
    }
}

impl TimerHandle {
    /// Waits for the next task to fire.
    pub async fn next(&mut self) -> Option<Deferred> {
        let task = self.rx.recv().await?;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Some(task)
    }

    /// True when nothing is sleeping and nothing is waiting to be received.
    pub fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_in_delay_order() {
        let (mut timer, mut handle) = TokioTimer::channel();
        timer.defer(Duration::from_millis(1500), Deferred::SettleList);
        timer.defer(Duration::from_millis(500), Deferred::RefillList);
        assert!(!handle.is_idle());

        assert_eq!(handle.next().await, Some(Deferred::RefillList));
        assert!(!handle.is_idle());
        assert_eq!(handle.next().await, Some(Deferred::SettleList));
        assert!(handle.is_idle());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let (mut timer, mut handle) = TokioTimer::channel();
        let start = tokio::time::Instant::now();
        let detach = Deferred::DetachItem {
            id: "BOOK-1".to_string(),
            generation: 0,
        };
        timer.defer(Duration::from_millis(500), detach.clone());

        let task = handle.next().await;
        assert_eq!(task, Some(detach));
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
