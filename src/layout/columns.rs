// SPDX-License-Identifier: MPL-2.0
//! Column count from container width.

use crate::app::config::{
    DEFAULT_DESKTOP_COLUMNS, DEFAULT_DESKTOP_MIN_WIDTH, DEFAULT_TABLET_COLUMNS,
    DEFAULT_TABLET_MIN_WIDTH,
};

/// Width breakpoints deciding how many columns the grid uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBreakpoints {
    pub desktop_min_width: f32,
    pub desktop_columns: usize,
    pub tablet_min_width: f32,
    pub tablet_columns: usize,
}

impl Default for ColumnBreakpoints {
    fn default() -> Self {
        Self {
            desktop_min_width: DEFAULT_DESKTOP_MIN_WIDTH,
            desktop_columns: DEFAULT_DESKTOP_COLUMNS,
            tablet_min_width: DEFAULT_TABLET_MIN_WIDTH,
            tablet_columns: DEFAULT_TABLET_COLUMNS,
        }
    }
}

impl ColumnBreakpoints {
    /// Returns the number of columns for a viewport of `width` pixels.
    /// Narrow viewports get a single column.
    #[must_use]
    pub fn column_count(&self, width: f32) -> usize {
        if width >= self.desktop_min_width {
            self.desktop_columns.max(1)
        } else if width >= self.tablet_min_width {
            self.tablet_columns.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_breakpoints_match_device_classes() {
        let breakpoints = ColumnBreakpoints::default();
        assert_eq!(breakpoints.column_count(1920.0), 4);
        assert_eq!(breakpoints.column_count(1025.0), 4);
        assert_eq!(breakpoints.column_count(1024.0), 2);
        assert_eq!(breakpoints.column_count(601.0), 2);
        assert_eq!(breakpoints.column_count(600.0), 1);
        assert_eq!(breakpoints.column_count(0.0), 1);
    }

    #[test]
    fn zero_configured_columns_still_yield_one() {
        let breakpoints = ColumnBreakpoints {
            desktop_columns: 0,
            ..ColumnBreakpoints::default()
        };
        assert_eq!(breakpoints.column_count(2000.0), 1);
    }
}
