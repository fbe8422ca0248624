//! EditorHost trait — focus and selection queries against the editor.

use serde::{Deserialize, Serialize};

use super::HostError;

/// A cursor position as the host reports it.
///
/// Both fields are 0-indexed. Adapters for hosts with a different base
/// convert before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub line: u32,
    pub ch: u32,
}

impl Cursor {
    pub fn new(line: u32, ch: u32) -> Self {
        Self { line, ch }
    }
}

/// Read-only view of the editor's focus state.
///
/// The pipeline calls these from its capture cycle only. Implementations
/// must not mutate editor state.
pub trait EditorHost {
    /// Path of the focused document, or `None` when nothing text-like has
    /// focus (no document open, a non-editor view focused).
    fn focused_document(&self) -> Result<Option<String>, HostError>;

    /// Text of the active selection. Empty when nothing is selected.
    fn selection_text(&self) -> Result<String, HostError>;

    /// The selection's `(from, to)` cursor pair.
    ///
    /// No ordering is assumed: hosts may report anchor/head, so `from` can
    /// lie after `to` when the user dragged upward.
    fn selection_range(&self) -> Result<(Cursor, Cursor), HostError>;
}

impl<H: EditorHost + ?Sized> EditorHost for &H {
    fn focused_document(&self) -> Result<Option<String>, HostError> {
        (**self).focused_document()
    }

    fn selection_text(&self) -> Result<String, HostError> {
        (**self).selection_text()
    }

    fn selection_range(&self) -> Result<(Cursor, Cursor), HostError> {
        (**self).selection_range()
    }
}
