//! Debounce coordinator — one pending deadline, cancel-and-replace.
//!
//! The deadline is the only timer state in the pipeline. Arming replaces
//! any earlier deadline, so within a window only the last trigger counts.
//! The work itself is not stored: when the deadline passes, the owner runs
//! its capture cycle against the editor state of that moment.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<Instant>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending deadline and arm a new one `interval` after `now`.
    pub fn schedule(&mut self, now: Instant, interval: Duration) -> Instant {
        let deadline = now + interval;
        self.pending = Some(deadline);
        deadline
    }

    /// Drop the pending deadline, if any. Returns whether one was armed.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Disarm and return `true` if the deadline has been reached.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    pub fn state(&self) -> DebounceState {
        if self.pending.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }
}
