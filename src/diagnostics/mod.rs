// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! Events are captured during a browsing session, kept in a memory-bounded
//! circular buffer and can be exported as a JSON report to help understand
//! what happened before a failure.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped user action, operation, warning or error
//! - [`DiagnosticsCollector`]: Owner of the buffer, drains [`DiagnosticsHandle`]s
//! - [`DiagnosticReport`]: Serializable snapshot of the buffer
//!
//! # Privacy
//!
//! Search text is never recorded, only its length. Photo ids are public
//! identifiers of the photo API and are kept as-is.

mod buffer;
mod collector;
mod events;
mod export;
mod report;

pub use buffer::{buffer_capacity_bounds, BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{AppOperation, DiagnosticEvent, DiagnosticEventKind, UserAction};
pub use export::{generate_default_filename, write_atomic, ExportError};
pub use report::{DiagnosticReport, ReportMetadata, SerializableEvent};
