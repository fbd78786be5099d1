// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for activity tracking.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// User-initiated actions worth recording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// A search was submitted. Only the length of the text is kept.
    SubmitSearch { query_len: usize },

    SelectCategory { category: String },

    /// Scrolling reached the prefetch distance and a new page was requested.
    LoadNextPage { page: u32 },

    OpenPhoto { photo_id: String },

    ClosePhoto,

    ToggleLike { photo_id: String, liked: bool },

    DownloadPhoto { photo_id: String },
}

/// Remote operations with their outcome and duration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum AppOperation {
    FetchPage {
        page: u32,
        results: usize,
        duration_ms: u64,
    },
    LoadInteracted {
        category: String,
        results: usize,
        duration_ms: u64,
    },
    SaveDownload {
        bytes: usize,
        duration_ms: u64,
    },
}

/// Payload of a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction {
        action: UserAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    Operation {
        operation: AppOperation,
    },
    Warning {
        message: String,
    },
    Error {
        message: String,
        /// Localization key of the error, when it came from [`crate::error::Error`].
        #[serde(skip_serializing_if = "Option::is_none")]
        i18n_key: Option<String>,
    },
}

/// A timestamped diagnostic event.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// Monotonic capture time; converted to a relative offset on export.
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self::with_timestamp(kind, Instant::now())
    }

    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}
