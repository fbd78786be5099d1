// SPDX-License-Identifier: MPL-2.0
//! Greedy shortest-column placement.
//!
//! Each photo goes to the column with the smallest accumulated height (ties
//! go to the lowest index). This is not globally optimal, but it is stable
//! and linear in the number of photos.

use super::filler::FillerSpec;
use crate::domain::photo::{Photo, PhotoId};

/// Inputs of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasonryParams {
    /// Requested number of columns; zero is treated as one.
    pub columns: usize,
    /// Width of the grid container in pixels; zero means unknown.
    pub container_width: f32,
    /// Gap between columns and between stacked photos.
    pub gap: f32,
    /// Whether filler placeholders should be generated.
    pub placeholders: bool,
    pub filler: FillerSpec,
}

impl MasonryParams {
    #[must_use]
    pub fn new(columns: usize, container_width: f32, gap: f32) -> Self {
        Self {
            columns,
            container_width,
            gap,
            placeholders: false,
            filler: FillerSpec::default(),
        }
    }

    #[must_use]
    pub fn with_placeholders(mut self, placeholders: bool) -> Self {
        self.placeholders = placeholders;
        self
    }

    #[must_use]
    pub fn with_filler(mut self, filler: FillerSpec) -> Self {
        self.filler = filler;
        self
    }

    /// Width of one column, or `None` when it cannot be computed
    /// (fewer than two columns, unknown container width, or a non-positive
    /// result).
    #[must_use]
    pub fn column_width(&self) -> Option<f32> {
        if self.columns < 2 || self.container_width <= 0.0 || !self.container_width.is_finite() {
            return None;
        }
        let columns = self.columns as f32;
        let width = (self.container_width - self.gap * (columns - 1.0)) / columns;
        (width.is_finite() && width > 0.0).then_some(width)
    }
}

/// One column of the grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column<'a> {
    pub photos: Vec<&'a Photo>,
    /// Accumulated estimated height (each photo plus one gap).
    pub height: f32,
    /// Filler block heights appended below the photos.
    pub fillers: Vec<f32>,
}

impl Column<'_> {
    /// Height including the fillers and their gaps.
    #[must_use]
    pub fn filled_height(&self, gap: f32) -> f32 {
        self.height + self.fillers.iter().map(|h| h + gap).sum::<f32>()
    }
}

/// Location of a photo in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub photo_id: PhotoId,
    pub column: usize,
    pub position: usize,
}

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryLayout<'a> {
    columns: Vec<Column<'a>>,
    column_width: Option<f32>,
}

impl<'a> MasonryLayout<'a> {
    #[must_use]
    pub fn columns(&self) -> &[Column<'a>] {
        &self.columns
    }

    /// Column width used for height estimates, `None` for the single-column
    /// fallback.
    #[must_use]
    pub fn column_width(&self) -> Option<f32> {
        self.column_width
    }

    /// Total number of placed photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|c| c.photos.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tallest accumulated column height.
    #[must_use]
    pub fn tallest(&self) -> f32 {
        self.columns.iter().map(|c| c.height).fold(0.0, f32::max)
    }

    /// Flattens the layout into per-photo placements, column by column.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.columns.iter().enumerate().flat_map(|(column, col)| {
            col.photos
                .iter()
                .enumerate()
                .map(move |(position, photo)| Placement {
                    photo_id: photo.id.clone(),
                    column,
                    position,
                })
        })
    }
}

/// Lays out the displayable photos of `photos` in input order.
///
/// Non-displayable photos (see [`Photo::is_displayable`]) are skipped. In the
/// degenerate cases every photo lands in the first column without fillers.
#[must_use]
pub fn layout<'a>(photos: &'a [Photo], params: &MasonryParams) -> MasonryLayout<'a> {
    let column_count = params.columns.max(1);
    let mut columns: Vec<Column<'a>> = vec![Column::default(); column_count];
    let list: Vec<&'a Photo> = photos.iter().filter(|p| p.is_displayable()).collect();

    let Some(column_width) = params.column_width() else {
        columns[0].photos = list;
        return MasonryLayout {
            columns,
            column_width: None,
        };
    };

    for &photo in &list {
        let estimated = column_width * photo.aspect_ratio();
        let target = shortest_column(&columns);
        let column = &mut columns[target];
        column.photos.push(photo);
        column.height += estimated + params.gap;
    }

    if params.placeholders {
        let tallest = columns.iter().map(|c| c.height).fold(0.0, f32::max);
        for (index, column) in columns.iter_mut().enumerate() {
            let missing = tallest - column.height;
            if missing <= 0.0 {
                continue;
            }
            let seed = FillerSpec::seed(list.len(), index);
            column.fillers = params.filler.fill(missing, params.gap, seed);
        }
    }

    MasonryLayout {
        columns,
        column_width: Some(column_width),
    }
}

fn shortest_column(columns: &[Column<'_>]) -> usize {
    let mut target = 0;
    for (index, column) in columns.iter().enumerate().skip(1) {
        if column.height < columns[target].height {
            target = index;
        }
    }
    target
}
