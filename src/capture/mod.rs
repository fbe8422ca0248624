//! Snapshot capture — what the pointer file describes.

pub mod focus;
pub mod snapshot;

pub use focus::build;
pub use snapshot::{FocusSnapshot, Selection};
