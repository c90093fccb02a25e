//! Cancellable timers and tickers.
//!
//! Timers run as tokio tasks and report back by sending an event over an unbounded
//! channel; the owner of the receiver applies the event to its state on its own task,
//! so no state is ever touched from a timer task. Each task is owned by a
//! [`TaskHandle`] which aborts it when cancelled or dropped. A component that holds
//! its handles therefore cannot receive events scheduled after its teardown.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Spawns timers that deliver events of type `E`
#[derive(Debug)]
pub struct Scheduler<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> Clone for Scheduler<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<E: Send + 'static> Scheduler<E> {
    /// Creates a scheduler and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Delivers `event` once after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn after(&self, label: &'static str, delay: Duration, event: E) -> TaskHandle {
        let tx = self.tx.clone();
        debug!("Scheduling '{label}' in {delay:?}");
        let handle = tokio::spawn(async move {
            time::sleep(delay).await;
            trace!("Timer '{label}' fired");
            // The receiver is gone once the shell has shut down
            let _ = tx.send(event);
        });
        TaskHandle::new(label, handle)
    }

    /// Delivers a clone of `event` every `period`, first after one full period.
    ///
    /// Missed ticks are skipped rather than burst.
    pub fn every(&self, label: &'static str, period: Duration, event: E) -> TaskHandle
    where
        E: Clone,
    {
        let tx = self.tx.clone();
        debug!("Starting ticker '{label}' every {period:?}");
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(event.clone()).is_err() {
                    break;
                }
            }
        });
        TaskHandle::new(label, handle)
    }
}

/// Ownership of a scheduled task; aborts it on drop
#[derive(Debug)]
pub struct TaskHandle {
    label: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl TaskHandle {
    fn new(label: &'static str, handle: JoinHandle<()>) -> Self {
        Self {
            label,
            handle: Some(handle),
        }
    }

    /// Aborts the task if it has not finished yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Cancelling '{}'", self.label);
            }
            handle.abort();
        }
    }

    /// Whether the task completed or was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
