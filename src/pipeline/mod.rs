//! Capture pipeline — routes host events to capture-and-write cycles.
//!
//! Focus changes write immediately; key and pointer releases re-arm the
//! debouncer and the write happens once input goes quiet. Every cycle
//! captures the editor state of the moment it runs, so a debounced write
//! always reflects the latest state, never the one at scheduling time.
//!
//! Cycles never fail outward. Their [`CycleOutcome`] is reported through
//! `tracing` and counted in [`PipelineStats`].

pub mod debounce;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::time::Instant;

use crate::capture;
use crate::config::SettingsStore;
use crate::host::{EditorHost, EventSubscription, HostEvent, Trigger};
use crate::pointer::{WriteError, write_pointer};

pub use debounce::{DebounceState, Debouncer};

/// Result of one capture-and-write cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The pointer file at this path was replaced.
    Written(PathBuf),
    /// Nothing focused; the file was left untouched.
    NoFocus,
    /// The write failed. The next trigger tries again.
    Failed(WriteError),
}

impl CycleOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Cycle counters, returned when the pipeline stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    pub writes: u64,
    pub skipped: u64,
    pub failures: u64,
}

pub struct Pipeline<H> {
    host: H,
    settings: Arc<SettingsStore>,
    storage_root: PathBuf,
    debouncer: Debouncer,
    stats: PipelineStats,
}

impl<H: EditorHost> Pipeline<H> {
    pub fn new(host: H, settings: Arc<SettingsStore>, storage_root: impl Into<PathBuf>) -> Self {
        Self {
            host,
            settings,
            storage_root: storage_root.into(),
            debouncer: Debouncer::new(),
            stats: PipelineStats::default(),
        }
    }

    /// Route one host event. Returns the outcome if a cycle ran now.
    pub fn handle_event(&mut self, event: HostEvent, now: Instant) -> Option<CycleOutcome> {
        tracing::trace!(?event, "host event");
        match event.trigger() {
            Trigger::Immediate => Some(self.trigger_immediate()),
            Trigger::Debounced => {
                self.schedule(now);
                None
            }
        }
    }

    /// Re-arm the debouncer with the currently configured interval.
    pub fn schedule(&mut self, now: Instant) -> Instant {
        self.debouncer.schedule(now, self.settings.debounce())
    }

    /// Cancel any pending debounced write and run a cycle now.
    pub fn trigger_immediate(&mut self) -> CycleOutcome {
        self.debouncer.cancel();
        self.capture_and_write()
    }

    /// Run the debounced cycle if its deadline has passed.
    ///
    /// For drivers that poll instead of using [`Pipeline::run`].
    pub fn fire_due(&mut self, now: Instant) -> Option<CycleOutcome> {
        if self.debouncer.take_due(now) {
            Some(self.capture_and_write())
        } else {
            None
        }
    }

    /// Capture the editor's current state and write it to the pointer file.
    pub fn capture_and_write(&mut self) -> CycleOutcome {
        let outcome = match capture::build(&self.host) {
            None => CycleOutcome::NoFocus,
            Some(snapshot) => {
                let target = self.settings.resolve_pointer_path(&self.storage_root);
                match write_pointer(&snapshot, &target) {
                    Ok(()) => CycleOutcome::Written(target),
                    Err(e) => CycleOutcome::Failed(e),
                }
            }
        };
        self.report(&outcome);
        outcome
    }

    /// Cancel any pending write without running it.
    pub fn shutdown(&mut self) {
        if self.debouncer.cancel() {
            tracing::debug!("pending pointer write cancelled");
        }
    }

    /// Drive the pipeline from a host subscription until its channel closes.
    ///
    /// While a write is pending, waiting for the next event is bounded by
    /// the debounce deadline; reaching it runs the cycle. Each event is
    /// acknowledged once handled. Closing the channel cancels a pending
    /// write.
    pub async fn run(&mut self, subscription: &mut EventSubscription) -> PipelineStats {
        loop {
            let next = subscription.events.recv();
            let event = match self.debouncer.deadline() {
                Some(deadline) => match tokio::time::timeout_at(deadline, next).await {
                    Ok(event) => event,
                    Err(_) => {
                        self.finish_debounce();
                        continue;
                    }
                },
                None => next.await,
            };
            let Some(event) = event else {
                break;
            };
            self.handle_event(event, Instant::now());
            subscription.acknowledge();
        }

        self.shutdown();
        tracing::debug!(
            writes = self.stats.writes,
            skipped = self.stats.skipped,
            failures = self.stats.failures,
            "event stream closed"
        );
        self.stats
    }

    pub fn state(&self) -> DebounceState {
        self.debouncer.state()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }

    fn finish_debounce(&mut self) {
        self.debouncer.cancel();
        self.capture_and_write();
    }

    fn report(&mut self, outcome: &CycleOutcome) {
        match outcome {
            CycleOutcome::Written(path) => {
                self.stats.writes += 1;
                tracing::debug!(path = %path.display(), "pointer file written");
            }
            CycleOutcome::NoFocus => {
                self.stats.skipped += 1;
                tracing::trace!("no focused document, nothing written");
            }
            CycleOutcome::Failed(e) => {
                self.stats.failures += 1;
                tracing::warn!(error = %e, "failed to write pointer file");
            }
        }
    }
}
