//! Scripted host — editor state and events read from a JSON-lines stream.
//!
//! Stands in for a real editor: every line replaces the whole editor state
//! and optionally raises one event. `active-noted` feeds it from stdin.
//!
//! Dispatch is synchronous like a real editor's: after raising an event the
//! reader waits until the pipeline has handled it before applying the next
//! line, so a capture always sees the state that came with its event.
//!
//! ```text
//! {"document":"notes/today.md","event":"focus-change"}
//! {"document":"notes/today.md","selection":{"text":"hi","anchor":{"line":2,"ch":0},"head":{"line":2,"ch":2}},"event":"mouse-up"}
//! ```

use std::sync::{Arc, Mutex};

use futures::StreamExt;
use serde::Deserialize;
use tokio::io::AsyncRead;
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use super::{Cursor, EditorHost, EventSource, EventSubscription, HostError, HostEvent};

/// Longest accepted script line. Longer lines are skipped.
const MAX_LINE_LENGTH: usize = 1 << 20;

/// A selection as the editor holds it: anchor where the drag started, head
/// where it ended.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptSelection {
    pub text: String,
    pub anchor: Cursor,
    pub head: Cursor,
}

/// Complete editor state at one point of the script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorState {
    pub document: Option<String>,
    pub selection: Option<ScriptSelection>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ScriptEvent {
    FocusChange,
    KeyUp,
    MouseUp,
}

impl From<ScriptEvent> for HostEvent {
    fn from(event: ScriptEvent) -> Self {
        match event {
            ScriptEvent::FocusChange => HostEvent::FocusChanged,
            ScriptEvent::KeyUp => HostEvent::KeyReleased,
            ScriptEvent::MouseUp => HostEvent::PointerReleased,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptLine {
    #[serde(flatten)]
    state: EditorState,
    #[serde(default)]
    event: Option<ScriptEvent>,
}

/// Editor state shared between the script reader and the pipeline.
#[derive(Debug, Clone, Default)]
pub struct SharedEditor {
    state: Arc<Mutex<EditorState>>,
}

impl SharedEditor {
    pub fn new(state: EditorState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Replace the whole editor state.
    pub fn replace(&self, state: EditorState) {
        match self.state.lock() {
            Ok(mut guard) => *guard = state,
            Err(poisoned) => *poisoned.into_inner() = state,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&EditorState) -> T) -> Result<T, HostError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| HostError::Unavailable("editor state poisoned".into()))?;
        Ok(f(&guard))
    }
}

impl EditorHost for SharedEditor {
    fn focused_document(&self) -> Result<Option<String>, HostError> {
        self.read(|s| s.document.clone())
    }

    fn selection_text(&self) -> Result<String, HostError> {
        self.read(|s| {
            s.selection
                .as_ref()
                .map(|sel| sel.text.clone())
                .unwrap_or_default()
        })
    }

    fn selection_range(&self) -> Result<(Cursor, Cursor), HostError> {
        self.read(|s| s.selection.as_ref().map(|sel| (sel.anchor, sel.head)))?
            .ok_or(HostError::ViewClosed)
    }
}

/// Event source and editor backed by a line-oriented reader.
pub struct ScriptHost<R> {
    reader: Option<R>,
    editor: SharedEditor,
    task: Option<JoinHandle<()>>,
}

impl<R> ScriptHost<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            editor: SharedEditor::default(),
            task: None,
        }
    }

    /// Handle to the editor state the script drives.
    pub fn editor(&self) -> SharedEditor {
        self.editor.clone()
    }
}

impl<R> EventSource for ScriptHost<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    /// Spawn the reader task. Must be called inside a tokio runtime, and
    /// only once: the reader is consumed.
    fn subscribe(&mut self) -> Result<EventSubscription, HostError> {
        let reader = self
            .reader
            .take()
            .ok_or_else(|| HostError::Unavailable("script input already consumed".into()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let handled = Arc::new(Notify::new());
        self.task = Some(tokio::spawn(read_script(
            reader,
            self.editor.clone(),
            tx,
            Arc::clone(&handled),
        )));

        Ok(EventSubscription::with_ack(rx, handled))
    }

    fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<R> Drop for ScriptHost<R> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn read_script<R>(
    reader: R,
    editor: SharedEditor,
    tx: UnboundedSender<HostEvent>,
    handled: Arc<Notify>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let mut line_no = 0usize;

    while let Some(line) = lines.next().await {
        line_no += 1;
        let line = match line {
            Ok(line) => line,
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                tracing::warn!(line = line_no, "script line too long, skipped");
                continue;
            }
            Err(LinesCodecError::Io(e)) => {
                tracing::error!(error = %e, "script input read failed");
                return;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed: ScriptLine = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "malformed script line, skipped");
                continue;
            }
        };

        editor.replace(parsed.state);
        if let Some(event) = parsed.event {
            if tx.send(event.into()).is_err() {
                // Pipeline gone.
                return;
            }
            tokio::select! {
                () = handled.notified() => {}
                () = tx.closed() => return,
            }
        }
    }

    tracing::debug!(lines = line_no, "script input closed");
}
