use serde::Serialize;

use crate::host::Cursor;

/// The focused document and its selection at one capture cycle.
///
/// Built fresh every cycle and never mutated afterwards. Field order is the
/// key order of the encoded pointer file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusSnapshot {
    pub path: String,
    /// Absent, not null, when nothing is selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<Selection>,
}

impl FocusSnapshot {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            selection: None,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// A non-empty selection with a 1-indexed, inclusive line range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    text: String,
    start_line: u32,
    end_line: u32,
}

impl Selection {
    /// Build from the host's 0-indexed `(from, to)` cursors in either order.
    ///
    /// Returns `None` for empty text.
    pub fn from_cursors(text: impl Into<String>, from: Cursor, to: Cursor) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        let (first, last) = if from.line <= to.line {
            (from.line, to.line)
        } else {
            (to.line, from.line)
        };
        Some(Self {
            text,
            start_line: first.saturating_add(1),
            end_line: last.saturating_add(1),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }
}
