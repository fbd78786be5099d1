// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report structure for JSON export.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DiagnosticEvent, DiagnosticEventKind};

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// Unique identifier for this report (UUID v4)
    pub report_id: String,
    /// When the report was generated (RFC 3339)
    pub generated_at: String,
    pub app_version: String,
    /// When diagnostic collection started (RFC 3339)
    pub collection_started_at: String,
    pub collection_duration_ms: u64,
    pub event_count: usize,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
    ) -> Self {
        Self {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
        }
    }
}

/// An event with its time expressed relative to the start of collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    /// Converts `event`, measuring its offset from `started_at`.
    ///
    /// Events captured before `started_at` get offset zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Millisecond offsets fit in u64
    pub fn from_event(event: &DiagnosticEvent, started_at: Instant) -> Self {
        Self {
            timestamp_ms: event
                .timestamp
                .saturating_duration_since(started_at)
                .as_millis() as u64,
            kind: event.kind.clone(),
        }
    }
}

/// Complete diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub events: Vec<SerializableEvent>,
}
