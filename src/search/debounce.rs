use std::time::Duration;

use tokio::task::JoinHandle;

use crate::event::DomainEvent;
use crate::site::Scheduler;

/// Trailing-edge debounce driven by the event loop.
///
/// Each trigger aborts the pending timer and bumps the generation; only an
/// elapsed event carrying the latest generation is acted on.
#[derive(Debug, Default)]
pub struct Debouncer {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Reschedules the timer. `event` builds the loop event for the new
    /// generation.
    pub(crate) fn trigger(
        &mut self,
        scheduler: &Scheduler,
        delay: Duration,
        event: impl FnOnce(u64) -> DomainEvent,
    ) -> u64 {
        self.cancel();
        let generation = self.generation;
        self.pending = Some(scheduler.send_after(delay, event(generation)));
        generation
    }

    /// Drops any pending timer. Elapsed events already queued become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Consumes the pending slot when `generation` is the live one.
    pub fn take_due(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.pending.is_none() {
            return false;
        }
        self.pending = None;
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
