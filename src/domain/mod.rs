// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`gallery`]: Filter categories and pagination values
//!   ([`Category`](gallery::Category), [`PageSize`](gallery::PageSize))
//! - [`interaction`]: Like/download rows ([`Interaction`](interaction::Interaction),
//!   [`LikeFlag`](interaction::LikeFlag), [`DownloadCount`](interaction::DownloadCount))
//! - [`photo`]: Photos from the photo API ([`Photo`](photo::Photo))

pub mod gallery;
pub mod interaction;
pub mod photo;
