// SPDX-License-Identifier: MPL-2.0
//! Photo source port.
//!
//! Abstracts the remote photo API: the editorial listing, text search,
//! lookup by id and download of the full-resolution bytes.

use crate::application::cancel::CancellationToken;
use crate::domain::gallery::{Page, PageSize};
use crate::domain::photo::{Photo, PhotoId};
use crate::error::Result;
use async_trait::async_trait;

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    /// Total number of matching photos.
    pub total: u32,
    /// Number of pages available at the requested page size.
    pub total_pages: u32,
    pub results: Vec<Photo>,
}

impl SearchPage {
    /// Returns `true` if pages remain after `page`.
    #[must_use]
    pub fn has_more_after(&self, page: Page) -> bool {
        page.value() < self.total_pages
    }
}

/// Remote photo catalogue.
///
/// Every method aborts with [`Error::Cancelled`](crate::error::Error::Cancelled)
/// once `cancel` fires.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    /// Returns one page of the default listing.
    async fn list(
        &self,
        page: Page,
        per_page: PageSize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Photo>>;

    /// Returns one page of search results for `query`.
    async fn search(
        &self,
        query: &str,
        page: Page,
        per_page: PageSize,
        cancel: &CancellationToken,
    ) -> Result<SearchPage>;

    /// Looks up a single photo.
    async fn photo(&self, id: &PhotoId, cancel: &CancellationToken) -> Result<Photo>;

    /// Downloads the full-resolution image bytes of `photo`.
    async fn download(&self, photo: &Photo, cancel: &CancellationToken) -> Result<Vec<u8>>;
}
