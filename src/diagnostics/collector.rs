// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating and storing diagnostic events.
//!
//! The collector owns the circular buffer. Code running on other tasks logs
//! through a cloned [`DiagnosticsHandle`]; its events reach the buffer the
//! next time [`DiagnosticsCollector::process_pending`] runs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};

use super::export::{generate_default_filename, write_atomic, ExportError};
use super::{
    AppOperation, BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind,
    DiagnosticReport, ReportMetadata, SerializableEvent, UserAction,
};
use crate::error::Error;

/// Channel capacity between handles and the collector.
const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Handle for sending diagnostic events to the collector.
///
/// Cheap to clone and usable from any thread. Sending never blocks: when
/// the channel is full the event is dropped.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    fn send(&self, kind: DiagnosticEventKind) {
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }

    pub fn log_action(&self, action: UserAction) {
        self.send(DiagnosticEventKind::UserAction {
            action,
            details: None,
        });
    }

    pub fn log_operation(&self, operation: AppOperation) {
        self.send(DiagnosticEventKind::Operation { operation });
    }

    pub fn log_warning(&self, message: impl Into<String>) {
        self.send(DiagnosticEventKind::Warning {
            message: message.into(),
        });
    }

    /// Logs a crate error together with its localization key.
    pub fn log_error(&self, error: &Error) {
        self.send(DiagnosticEventKind::Error {
            message: error.to_string(),
            i18n_key: Some(error.i18n_key().to_string()),
        });
    }
}

/// Central collector for diagnostic events.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    /// Monotonic start, for relative event offsets.
    collection_started_at: Instant,
    /// Wall-clock start, for report metadata.
    collection_started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);
        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves every event queued by handles into the buffer.
    pub fn process_pending(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
        }
    }

    /// Records an action directly, bypassing the channel.
    pub fn log_action(&mut self, action: UserAction) {
        self.buffer.push(DiagnosticEvent::new(DiagnosticEventKind::UserAction {
            action,
            details: None,
        }));
    }

    /// Records an operation directly, bypassing the channel.
    pub fn log_operation(&mut self, operation: AppOperation) {
        self.buffer
            .push(DiagnosticEvent::new(DiagnosticEventKind::Operation { operation }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Builds a report of the current buffer contents.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn build_report(&self) -> DiagnosticReport {
        let duration_ms = self.collection_started_at.elapsed().as_millis() as u64;
        let events: Vec<SerializableEvent> = self
            .buffer
            .iter()
            .map(|event| SerializableEvent::from_event(event, self.collection_started_at))
            .collect();
        DiagnosticReport {
            metadata: ReportMetadata::new(self.collection_started_at_utc, duration_ms, events.len()),
            events,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build_report())
    }

    /// Writes the report to `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or writing fails.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(path, &self.export_json()?)?;
        tracing::info!(path = %path.display(), "diagnostics exported");
        Ok(path.to_path_buf())
    }

    /// Writes the report into `dir` under a timestamped name.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or writing fails.
    pub fn export_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        self.export_to_file(dir.as_ref().join(generate_default_filename()))
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
