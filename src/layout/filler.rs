// SPDX-License-Identifier: MPL-2.0
//! Deterministic filler blocks for unbalanced columns.
//!
//! Filler heights look random but come from a seeded generator, so the same
//! photo count and column index always produce the same blocks and repeated
//! renders do not flicker.

use crate::app::config::{
    DEFAULT_FILLER_BASE_PX, DEFAULT_FILLER_SPAN_PX, DEFAULT_MIN_FILLER_PX,
};

/// Small 32-bit PRNG (mulberry32).
///
/// # Example
///
/// ```
/// use mosaic_lens::layout::Mulberry32;
///
/// let mut a = Mulberry32::new(42);
/// let mut b = Mulberry32::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Returns the next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }
}

/// Shape of the generated filler blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillerSpec {
    /// Shortfall at or below which no more fillers are emitted.
    pub min_height: f32,
    /// Smallest drawn block height.
    pub base_height: f32,
    /// Range added on top of `base_height`.
    pub span: f32,
}

impl Default for FillerSpec {
    fn default() -> Self {
        Self {
            min_height: DEFAULT_MIN_FILLER_PX,
            base_height: DEFAULT_FILLER_BASE_PX,
            span: DEFAULT_FILLER_SPAN_PX,
        }
    }
}

impl FillerSpec {
    /// Seed for a column, derived from the photo count and column index.
    #[must_use]
    pub fn seed(photo_count: usize, column: usize) -> u32 {
        let count = u32::try_from(photo_count).unwrap_or(u32::MAX);
        let column = u32::try_from(column).unwrap_or(u32::MAX);
        count
            .wrapping_add(1)
            .wrapping_mul(1000)
            .wrapping_add(column.wrapping_mul(97))
    }

    /// Generates the blocks that bring a column `missing` pixels short of the
    /// tallest one to within `min_height` of it.
    ///
    /// Each emitted block is at least `min_height` tall; after each block the
    /// shortfall drops by the drawn height plus `gap`.
    #[must_use]
    pub fn fill(&self, missing: f32, gap: f32, seed: u32) -> Vec<f32> {
        let mut blocks = Vec::new();
        if !missing.is_finite() {
            return blocks;
        }

        let mut rng = Mulberry32::new(seed);
        let mut missing = missing;
        let step_floor = self.min_height.max(1.0);

        while missing > self.min_height {
            let drawn = (self.base_height + rng.next_f64() as f32 * self.span).round();
            blocks.push(drawn.min(missing.max(self.min_height)));
            missing -= drawn.max(step_floor) + gap.max(0.0);
        }

        blocks
    }
}
