// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! These traits use only domain types, so the application layer stays
//! independent of the HTTP adapters in `infrastructure`.
//!
//! # Available Ports
//!
//! - [`photo_source`]: Listing, search, lookup and download of photos
//! - [`interaction_store`]: Rows of the remote interaction table
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync` so adapters can be shared with spawned tasks
//! - Photo calls take a cancellation token; store calls are never cancelled

pub mod interaction_store;
pub mod photo_source;

pub use interaction_store::{InteractionStore, StoreResult};
pub use photo_source::{PhotoSource, SearchPage};
