//! Pointer file — encoding and delivery of focus snapshots.

pub mod sink;

pub use sink::{WriteError, encode, write_pointer};
