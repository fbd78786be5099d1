// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! owns a `State`, consumes `Message`s in `handle`, and returns an `Effect`
//! for the shell to carry out. None of them performs I/O.
//!
//! - [`search_bar`] - query field, category menu and the search debouncer
//! - [`gallery`] - paging, cancellation and the displayed photo list
//! - [`lightbox`] - enlarged photo with like, download and hover zoom
//! - [`notifications`] - transient user feedback

pub mod gallery;
pub mod lightbox;
pub mod notifications;
pub mod search_bar;
