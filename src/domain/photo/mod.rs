// SPDX-License-Identifier: MPL-2.0
//! Photo domain types.
//!
//! Photos are sourced entirely from the remote photo API and are immutable
//! once fetched.

pub mod types;

pub use types::{Photo, PhotoId, PhotoUrls};
