// SPDX-License-Identifier: MPL-2.0
//! Gallery newtypes.
//!
//! Type-safe wrappers for pagination values, ensuring they are always
//! within the range the photo API accepts.

// =============================================================================
// Bounds
// =============================================================================

/// Results-per-page bounds (the photo API caps `per_page` at 30).
pub mod page_size_bounds {
    /// Minimum results per page.
    pub const MIN: u32 = 1;
    /// Maximum results per page.
    pub const MAX: u32 = 30;
    /// Default results per page.
    pub const DEFAULT: u32 = 6;
}

/// Interacted-photo batch size bounds.
pub mod batch_size_bounds {
    /// Minimum lookups per batch.
    pub const MIN: usize = 1;
    /// Maximum lookups per batch.
    pub const MAX: usize = 24;
    /// Default lookups per batch.
    pub const DEFAULT: usize = 6;
}

// =============================================================================
// PageSize
// =============================================================================

/// Number of results requested per page, clamped to 1–30.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u32);

impl PageSize {
    /// Creates a new page size, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.clamp(page_size_bounds::MIN, page_size_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` if `count` results fill a whole page.
    #[must_use]
    pub fn is_full(self, count: usize) -> bool {
        count == self.0 as usize
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(page_size_bounds::DEFAULT)
    }
}

// =============================================================================
// BatchSize
// =============================================================================

/// Number of by-id lookups issued concurrently, clamped to 1–24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSize(usize);

impl BatchSize {
    /// Creates a new batch size, clamping the value to the valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(batch_size_bounds::MIN, batch_size_bounds::MAX))
    }

    /// Returns the raw value.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(batch_size_bounds::DEFAULT)
    }
}

// =============================================================================
// Page
// =============================================================================

/// One-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Page(u32);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Creates a page number; zero is raised to the first page.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value.max(1))
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the previous page, staying on the first page.
    #[must_use]
    pub fn previous(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    #[must_use]
    pub fn is_first(self) -> bool {
        self.0 == 1
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::FIRST
    }
}
