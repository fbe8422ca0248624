//! Host capabilities consumed by the pipeline.
//!
//! The editor itself is a black box: it answers focus/selection queries
//! ([`EditorHost`]) and raises events ([`EventSource`]). Adapters for a
//! concrete host implement these traits; [`script`] is the one shipped here.

pub mod editor;
pub mod events;
pub mod script;

pub use editor::{Cursor, EditorHost};
pub use events::{EventSource, EventSubscription, HostEvent, Trigger};

/// Editor query error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The view was torn down between the event and the query.
    #[error("editor view closed")]
    ViewClosed,
    /// Any other host-side failure.
    #[error("host unavailable: {0}")]
    Unavailable(String),
}
