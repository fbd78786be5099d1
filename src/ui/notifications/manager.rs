// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle management.
//!
//! The `Manager` handles queuing, expiry and dismissal of notifications.

use super::notification::{Notification, NotificationId, Severity};
use crate::diagnostics::DiagnosticsHandle;
use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of notifications visible at once.
const MAX_VISIBLE: usize = 3;

/// Key prefix of the page and category load failures.
const LOAD_ERROR_KEY: &str = "notification-load-error";

#[derive(Debug, Clone)]
pub enum Message {
    Dismiss(NotificationId),
    /// Periodic check of the expiry timers.
    Tick,
}

/// Manages the notification queue and visible notifications.
#[derive(Debug, Default)]
pub struct Manager {
    /// Newest first.
    visible: VecDeque<Notification>,
    queue: VecDeque<Notification>,
    diagnostics: Option<DiagnosticsHandle>,
}

impl Manager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diagnostics handle for logging warnings and errors.
    pub fn set_diagnostics(&mut self, handle: DiagnosticsHandle) {
        self.diagnostics = Some(handle);
    }

    /// Pushes a new notification.
    ///
    /// Warnings and errors are also recorded in the diagnostics log.
    pub fn push(&mut self, notification: Notification) {
        if let Some(handle) = &self.diagnostics {
            match (notification.severity(), notification.source()) {
                (Severity::Error, Some(error)) => handle.log_error(error),
                (Severity::Warning | Severity::Error, _) => {
                    handle.log_warning(notification.message_key());
                }
                (Severity::Success | Severity::Info, _) => {}
            }
        }

        if self.visible.len() < MAX_VISIBLE {
            self.visible.push_front(notification);
        } else {
            self.queue.push_back(notification);
        }
    }

    /// Dismisses a notification by its ID.
    ///
    /// Returns `true` if the notification was found and removed.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        if let Some(pos) = self.visible.iter().position(|n| n.id() == id) {
            self.visible.remove(pos);
            self.promote_from_queue();
            return true;
        }
        if let Some(pos) = self.queue.iter().position(|n| n.id() == id) {
            self.queue.remove(pos);
            return true;
        }
        false
    }

    /// Dismisses the visible notifications that expired at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        let expired: Vec<NotificationId> = self
            .visible
            .iter()
            .filter(|n| n.is_expired_at(now))
            .map(Notification::id)
            .collect();
        for id in expired {
            self.dismiss(id);
        }
    }

    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                self.dismiss(*id);
            }
            Message::Tick => self.tick_at(Instant::now()),
        }
    }

    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.visible.iter()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    /// Removes every notification and returns them, visible ones first.
    pub fn drain(&mut self) -> Vec<Notification> {
        let mut all: Vec<Notification> = self.visible.drain(..).rev().collect();
        all.extend(self.queue.drain(..));
        all
    }

    /// Clears stale load failures once a load succeeds.
    pub fn clear_load_errors(&mut self) {
        let visible_before = self.visible.len();
        self.visible.retain(|n| n.message_key() != LOAD_ERROR_KEY);
        self.queue.retain(|n| n.message_key() != LOAD_ERROR_KEY);
        if self.visible.len() < visible_before {
            self.promote_from_queue();
        }
    }

    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            match self.queue.pop_front() {
                Some(notification) => self.visible.push_back(notification),
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticEventKind, DiagnosticsCollector};
    use crate::error::Error;
    use std::time::Duration;

    #[test]
    fn push_queues_when_visible_is_full() {
        let mut manager = Manager::new();
        for i in 0..MAX_VISIBLE {
            manager.push(Notification::success(format!("test-{i}")));
        }
        manager.push(Notification::success("queued"));

        assert_eq!(manager.visible_count(), MAX_VISIBLE);
        assert_eq!(manager.queued_count(), 1);
    }

    #[test]
    fn dismiss_promotes_from_queue() {
        let mut manager = Manager::new();
        let first = Notification::success("visible-0");
        let first_id = first.id();
        manager.push(first);
        for i in 1..=MAX_VISIBLE {
            manager.push(Notification::success(format!("visible-{i}")));
        }

        assert!(manager.dismiss(first_id));
        assert_eq!(manager.visible_count(), MAX_VISIBLE);
        assert_eq!(manager.queued_count(), 0);
        assert!(!manager.dismiss(first_id));
    }

    #[test]
    fn tick_keeps_errors_and_expires_the_rest() {
        let mut manager = Manager::new();
        manager.push(Notification::error("notification-like-error"));
        manager.push(Notification::success("notification-download-success"));

        manager.tick_at(Instant::now() + Duration::from_secs(10));

        assert_eq!(manager.visible_count(), 1);
        assert_eq!(
            manager.visible().next().map(Notification::message_key),
            Some("notification-like-error")
        );
    }

    #[test]
    fn clear_load_errors_keeps_other_messages() {
        let mut manager = Manager::new();
        manager.push(Notification::error(LOAD_ERROR_KEY));
        manager.push(Notification::error(LOAD_ERROR_KEY));
        manager.push(Notification::success("notification-download-success"));
        manager.push(Notification::error("notification-like-error"));

        manager.clear_load_errors();

        assert_eq!(manager.visible_count(), 2);
        assert!(manager.visible().all(|n| n.message_key() != LOAD_ERROR_KEY));
    }

    #[test]
    fn warnings_and_errors_reach_diagnostics() {
        let mut collector = DiagnosticsCollector::default();
        let mut manager = Manager::new();
        manager.set_diagnostics(collector.handle());

        manager.push(Notification::success("notification-download-success"));
        manager.push(Notification::warning("notification-config-load-error"));
        manager.push(Notification::from_error(
            "notification-like-error",
            Error::Http("offline".into()),
        ));
        collector.process_pending();

        let kinds: Vec<_> = collector.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(kinds.len(), 2);
        assert!(matches!(kinds[0], DiagnosticEventKind::Warning { .. }));
        assert!(matches!(
            &kinds[1],
            DiagnosticEventKind::Error { i18n_key: Some(key), .. } if key == "error-network"
        ));
    }

    #[test]
    fn drain_returns_oldest_visible_first() {
        let mut manager = Manager::new();
        manager.push(Notification::info("first"));
        manager.push(Notification::info("second"));
        let keys: Vec<_> = manager
            .drain()
            .iter()
            .map(|n| n.message_key().to_string())
            .collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert!(!manager.has_notifications());
    }
}
