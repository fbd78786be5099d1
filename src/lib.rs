// SPDX-License-Identifier: MPL-2.0
//! `mosaic_lens` is a photo gallery client laid out as a masonry grid.
//!
//! It browses and searches a remote photo catalogue page by page, records
//! likes and downloads per anonymous session in a remote store, and
//! presents the user's liked and downloaded photos as virtual categories.
//! Text is localized with Fluent.

#![doc(html_root_url = "https://docs.rs/mosaic_lens/0.1.0")]

pub mod app;
pub mod application;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod infrastructure;
pub mod layout;
pub mod ui;

#[cfg(test)]
mod test_utils;
