// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and startup flags for the application.

use crate::application::events::InteractionEvent;
use crate::ui::{gallery, lightbox, notifications, search_bar};

/// Top-level messages consumed by `App::dispatch`. The variants forward
/// component messages while keeping a single update entrypoint.
#[derive(Debug, Clone)]
pub enum Message {
    SearchBar(search_bar::Message),
    Gallery(gallery::Message),
    Lightbox(lightbox::Message),
    Notification(notifications::NotificationMessage),
    /// The debounced query may be ready.
    DebounceElapsed,
    /// A like or download was persisted.
    Interaction(InteractionEvent),
}

impl From<search_bar::Message> for Message {
    fn from(message: search_bar::Message) -> Self {
        Message::SearchBar(message)
    }
}

impl From<gallery::Message> for Message {
    fn from(message: gallery::Message) -> Self {
        Message::Gallery(message)
    }
}

impl From<lightbox::Message> for Message {
    fn from(message: lightbox::Message) -> Self {
        Message::Lightbox(message)
    }
}

/// Runtime flags passed from the command line.
#[derive(Debug, Default, Clone)]
pub struct Flags {
    /// Optional locale override.
    pub lang: Option<String>,
    /// Optional config directory override.
    pub config_dir: Option<String>,
    /// Optional data directory override (session file).
    pub data_dir: Option<String>,
}
