//! Block Event Notifications
//!
//! Lets a front end redraw blocks without the core knowing how they are
//! drawn. Every state transition publishes a header event and every
//! streamed chunk publishes an output event over an unbounded tokio
//! channel.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use crate::execution::OutputChunk;
use crate::models::BlockState;

/// Notification about one block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    /// Lifecycle state changed (header should be redrawn)
    HeaderChanged {
        index: usize,
        state: BlockState,
        /// Set once the run is `Done`
        exit_code: Option<i32>,
    },
    /// Output was appended while running
    OutputChanged { index: usize, chunk: OutputChunk },
}

impl BlockEvent {
    /// Index of the block the event is about
    pub fn index(&self) -> usize {
        match self {
            BlockEvent::HeaderChanged { index, .. } | BlockEvent::OutputChanged { index, .. } => {
                *index
            }
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            BlockEvent::HeaderChanged { .. } => "header_changed",
            BlockEvent::OutputChanged { .. } => "output_changed",
        }
    }
}

/// Event with the time it was published
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    /// The event itself
    pub event: BlockEvent,
    /// Publish time
    pub timestamp: DateTime<Utc>,
}

/// Receiving half handed to the front end
pub type EventReceiver = mpsc::UnboundedReceiver<EventEnvelope>;

/// Publishing half shared by every block of a session
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<EventEnvelope>,
}

impl EventSender {
    /// Publish an event
    ///
    /// A closed receiver is not an error: the front end may have gone away
    /// while a block was still running.
    pub fn publish(&self, event: BlockEvent) {
        debug!("Publishing {} for block {}", event.kind(), event.index());

        let envelope = EventEnvelope {
            event,
            timestamp: Utc::now(),
        };
        if self.tx.send(envelope).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }

    /// Whether the receiving half is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create a connected sender/receiver pair
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}
