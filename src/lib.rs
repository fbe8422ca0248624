//! active-note — mirrors an editor's focus state into a pointer file.
//!
//! The pointer file holds the focused document's path and, when text is
//! selected, the selection with its 1-indexed line range. Out-of-process
//! tools poll it to resolve references like "this" to the user's current
//! editing context.
//!
//! Layout, leaf first:
//! - [`config`] — pointer path and debounce interval.
//! - [`host`] — what the editor provides: queries and events.
//! - [`capture`] — builds a [`FocusSnapshot`] from the editor.
//! - [`pointer`] — encodes and writes snapshots.
//! - [`pipeline`] — debouncing and event routing.

pub mod atomic;
pub mod capture;
pub mod config;
pub mod host;
pub mod pipeline;
pub mod pointer;

pub use capture::{FocusSnapshot, Selection};
pub use config::{Settings, SettingsStore};
pub use host::{EditorHost, EventSource, HostEvent};
pub use pipeline::{CycleOutcome, Pipeline, PipelineStats};
