// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Endpoints**: Photo API and interaction store locations
//! - **Gallery**: Pagination, debounce and scroll prefetch
//! - **Layout**: Masonry gap, breakpoints and filler blocks
//! - **Lightbox**: Zoom and like-burst settings
//! - **Caches**: Interacted-photo lookups and diagnostics

use crate::domain::gallery::newtypes::{batch_size_bounds, page_size_bounds};

// ==========================================================================
// Endpoint Defaults
// ==========================================================================

/// Base URL of the photo API.
pub const DEFAULT_PHOTO_API_URL: &str = "https://api.unsplash.com";

/// Name of the interaction table in the remote store.
pub const DEFAULT_INTERACTIONS_TABLE: &str = "interactions";

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("MosaicLens/", env!("CARGO_PKG_VERSION"));

// ==========================================================================
// Gallery Defaults
// ==========================================================================

/// Results requested per page.
pub const DEFAULT_PER_PAGE: u32 = page_size_bounds::DEFAULT;

/// Delay before a typed query is applied (in milliseconds).
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 400;

/// Minimum debounce delay (in milliseconds).
pub const MIN_SEARCH_DEBOUNCE_MS: u64 = 0;

/// Maximum debounce delay (in milliseconds).
pub const MAX_SEARCH_DEBOUNCE_MS: u64 = 5_000;

/// Distance to the bottom of the page (in pixels) at which the next page is
/// prefetched.
pub const DEFAULT_PREFETCH_DISTANCE_PX: f32 = 800.0;

/// Number of by-id lookups issued concurrently by the interacted loader.
pub const DEFAULT_INTERACTED_BATCH_SIZE: usize = batch_size_bounds::DEFAULT;

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Container width assumed when none is given (in pixels).
pub const DEFAULT_CONTAINER_WIDTH_PX: f32 = 1280.0;

/// Gap between columns and stacked photos (in pixels).
pub const DEFAULT_GAP_PX: f32 = 16.0;

/// Viewport width from which the desktop column count applies.
pub const DEFAULT_DESKTOP_MIN_WIDTH: f32 = 1025.0;

/// Columns used on desktop-sized viewports.
pub const DEFAULT_DESKTOP_COLUMNS: usize = 4;

/// Viewport width from which the tablet column count applies.
pub const DEFAULT_TABLET_MIN_WIDTH: f32 = 601.0;

/// Columns used on tablet-sized viewports.
pub const DEFAULT_TABLET_COLUMNS: usize = 2;

/// Shortfall at or below which no filler block is emitted (in pixels).
pub const DEFAULT_MIN_FILLER_PX: f32 = 120.0;

/// Smallest drawn filler block (in pixels).
pub const DEFAULT_FILLER_BASE_PX: f32 = 160.0;

/// Random range added to the filler base (in pixels).
pub const DEFAULT_FILLER_SPAN_PX: f32 = 180.0;

// ==========================================================================
// Lightbox Defaults
// ==========================================================================

/// Scale applied while hovering the enlarged photo.
pub const DEFAULT_HOVER_ZOOM_FACTOR: f32 = 2.0;

/// Minimum hover zoom factor.
pub const MIN_HOVER_ZOOM_FACTOR: f32 = 1.0;

/// Maximum hover zoom factor.
pub const MAX_HOVER_ZOOM_FACTOR: f32 = 4.0;

/// Viewport width from which hover zoom is enabled (in pixels).
pub const DEFAULT_ZOOM_MIN_VIEWPORT_PX: f32 = 1024.0;

/// Duration of the like burst animation (in milliseconds).
pub const DEFAULT_LIKE_BURST_MS: u64 = 520;

// ==========================================================================
// Cache Defaults
// ==========================================================================

/// Number of resolved photos kept by the by-id lookup cache.
pub const DEFAULT_PHOTO_CACHE_ENTRIES: usize = 256;

/// Minimum number of cached photos.
pub const MIN_PHOTO_CACHE_ENTRIES: usize = 16;

/// Maximum number of cached photos.
pub const MAX_PHOTO_CACHE_ENTRIES: usize = 4_096;

/// Default diagnostics buffer capacity (number of events).
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 1_000;

/// Minimum diagnostics buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 100;

/// Maximum diagnostics buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;
