// SPDX-License-Identifier: MPL-2.0
//! Masonry layout engine.
//!
//! Photos are packed into columns with a greedy shortest-column heuristic,
//! and optional filler blocks level the column bottoms while more photos
//! are loading.
//!
//! The layout is derived data: it is recomputed whenever the photo list,
//! the column count, the container width or the gap changes, and is never
//! persisted.

pub mod columns;
pub mod filler;
pub mod masonry;

pub use columns::ColumnBreakpoints;
pub use filler::{FillerSpec, Mulberry32};
pub use masonry::{layout, Column, MasonryLayout, MasonryParams, Placement};
