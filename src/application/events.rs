// SPDX-License-Identifier: MPL-2.0
//! Invalidation channel for interaction changes.
//!
//! Components that cache derived data (the interacted-photos loader, the
//! gallery) subscribe to the bus and drop stale entries when an event
//! arrives. Publishing never blocks and never fails: an event with no
//! subscriber is simply dropped.

use crate::domain::interaction::InteractionKind;
use crate::domain::photo::PhotoId;
use tokio::sync::broadcast;

/// Number of events a slow subscriber may fall behind before it lags.
const BUS_CAPACITY: usize = 64;

/// A persisted change to an interaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    LikesChanged { image_id: PhotoId, liked: bool },
    DownloadsChanged { image_id: PhotoId },
}

impl InteractionEvent {
    /// Which interaction kind the event invalidates.
    #[must_use]
    pub fn kind(&self) -> InteractionKind {
        match self {
            InteractionEvent::LikesChanged { .. } => InteractionKind::Like,
            InteractionEvent::DownloadsChanged { .. } => InteractionKind::Download,
        }
    }

    #[must_use]
    pub fn image_id(&self) -> &PhotoId {
        match self {
            InteractionEvent::LikesChanged { image_id, .. }
            | InteractionEvent::DownloadsChanged { image_id } => image_id,
        }
    }
}

/// Cloneable sender side of the invalidation channel.
#[derive(Debug, Clone)]
pub struct InteractionBus {
    sender: broadcast::Sender<InteractionEvent>,
}

impl InteractionBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: InteractionEvent) {
        tracing::debug!(?event, "interaction event");
        // An error only means nobody is listening right now.
        let _ = self.sender.send(event);
    }

    /// Returns a receiver that sees every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<InteractionEvent> {
        self.sender.subscribe()
    }
}

impl Default for InteractionBus {
    fn default() -> Self {
        Self::new()
    }
}
