//! EventSource trait — subscription to host-raised editor events.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::sync::mpsc::UnboundedReceiver;

use super::HostError;

/// Editor events the pipeline reacts to. Nothing else is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The active document or view changed.
    FocusChanged,
    /// A key was released.
    KeyReleased,
    /// A pointer button was released.
    PointerReleased,
}

/// How an event is turned into a capture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Capture and write now, cancelling any pending debounced write.
    Immediate,
    /// Re-arm the debounce timer.
    Debounced,
}

impl HostEvent {
    pub fn trigger(self) -> Trigger {
        match self {
            Self::FocusChanged => Trigger::Immediate,
            Self::KeyReleased | Self::PointerReleased => Trigger::Debounced,
        }
    }
}

/// Result of a successful [`EventSource::subscribe`] call.
pub struct EventSubscription {
    /// Host events in the order the host raised them. The channel closes
    /// when the host goes away, which tears the pipeline down.
    pub events: UnboundedReceiver<HostEvent>,
    /// Signalled once per event after the consumer has handled it.
    handled: Arc<Notify>,
}

impl EventSubscription {
    pub fn new(events: UnboundedReceiver<HostEvent>) -> Self {
        Self::with_ack(events, Arc::new(Notify::new()))
    }

    /// Subscription whose consumer signals `handled` after every event.
    ///
    /// Hosts whose state must not move on before the handler has run (a
    /// synchronous dispatch model) wait on it after each send.
    pub fn with_ack(events: UnboundedReceiver<HostEvent>, handled: Arc<Notify>) -> Self {
        Self { events, handled }
    }

    /// Mark the last received event as handled.
    pub fn acknowledge(&self) {
        self.handled.notify_one();
    }
}

/// Delivers host events to the pipeline.
///
/// Adapters hide whatever dispatch mechanism the host has (callbacks, DOM
/// listeners, a message bus) behind a plain channel.
pub trait EventSource {
    /// Start delivering focus-change, key-release and pointer-release events.
    fn subscribe(&mut self) -> Result<EventSubscription, HostError>;

    /// Stop delivering events. The subscription's channel closes.
    fn unsubscribe(&mut self);
}
