// SPDX-License-Identifier: MPL-2.0
//! Gallery domain types.
//!
//! This module contains the filter categories and validated pagination
//! values used by the gallery orchestrator.

pub mod category;
pub mod newtypes;

pub use category::{compose_search_text, Category, Topic};
pub use newtypes::{BatchSize, Page, PageSize};
