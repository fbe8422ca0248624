//! Focus resolution — turns the editor's current state into a snapshot.
//!
//! Query-only: the host is asked for the focused document, then for the
//! selection. Host failures never escape; they degrade to "nothing focused"
//! or "nothing selected".

use crate::host::{EditorHost, HostError};

use super::{FocusSnapshot, Selection};

/// Build a snapshot of the editor's focus state.
///
/// - No focused document (or the query fails) → `None`; the caller writes
///   nothing this cycle.
/// - Empty selection → snapshot without a selection.
/// - A failing selection query → snapshot without a selection.
pub fn build<H: EditorHost>(host: &H) -> Option<FocusSnapshot> {
    let path = match host.focused_document() {
        Ok(Some(path)) if !path.is_empty() => path,
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!(error = %e, "focused document query failed");
            return None;
        }
    };

    let snapshot = FocusSnapshot::new(path);
    match resolve_selection(host) {
        Ok(Some(selection)) => Some(snapshot.with_selection(selection)),
        Ok(None) => Some(snapshot),
        Err(e) => {
            tracing::debug!(
                path = %snapshot.path,
                error = %e,
                "selection query failed, treating as no selection"
            );
            Some(snapshot)
        }
    }
}

/// Read the selection text and, only when it is non-empty, its range.
fn resolve_selection<H: EditorHost>(host: &H) -> Result<Option<Selection>, HostError> {
    let text = host.selection_text()?;
    if text.is_empty() {
        return Ok(None);
    }
    let (from, to) = host.selection_range()?;
    Ok(Selection::from_cursors(text, from, to))
}
