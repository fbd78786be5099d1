// SPDX-License-Identifier: MPL-2.0
//! Transient user feedback.
//!
//! Notifications carry an i18n key plus arguments and are resolved when
//! rendered. At most three are visible at once; the rest wait in a queue.
//! Success and info messages expire after 3 seconds, warnings after 5,
//! errors stay until dismissed.

mod manager;
mod notification;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
