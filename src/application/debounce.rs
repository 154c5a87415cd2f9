//! Single-slot debouncer.
//!
//! Each `push` cancels the pending value and reschedules the deadline; only a
//! value left untouched for the whole quiescence window fires. The debouncer
//! never sleeps itself: the runtime waits for [`Debouncer::deadline`] and then
//! calls [`Debouncer::fire_due`].

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace any pending value and restart the window at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.window,
        });
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Take the pending value once its deadline has passed.
    pub fn fire_due(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.deadline <= now);
        if due { self.cancel() } else { None }
    }
}
