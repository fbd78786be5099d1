// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and in-memory port fakes.
//!
//! This module re-exports `approx::assert_abs_diff_eq` for float comparison,
//! which properly handles floating-point precision issues that `assert_eq!` cannot.
//! [`FakePhotoSource`] and [`FakeInteractionStore`] stand in for the HTTP
//! adapters in unit tests.

// Re-export the approx macro for convenient use in tests
pub use approx::assert_abs_diff_eq;

use crate::application::cancel::{run_cancellable, CancellationToken};
use crate::application::port::{InteractionStore, PhotoSource, SearchPage, StoreResult};
use crate::domain::gallery::{Page, PageSize};
use crate::domain::interaction::{
    DownloadCount, Interaction, InteractionKind, InteractionPatch, LikeFlag, NewInteraction, RowId,
    SessionId,
};
use crate::domain::photo::{Photo, PhotoId, PhotoUrls};
use crate::error::{Error, Result, StoreError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Default epsilon for f32 comparisons.
/// Suitable for values that should be "exactly equal" but may have minor floating-point errors.
pub const F32_EPSILON: f32 = 1e-6;

/// Builds a displayable photo with the given id and natural size.
pub fn photo(id: &str, width: u32, height: u32) -> Photo {
    Photo::new(id, width, height).with_urls(PhotoUrls {
        raw: format!("https://img.test/{id}/raw"),
        full: format!("https://img.test/{id}/full"),
        regular: format!("https://img.test/{id}/regular"),
        small: format!("https://img.test/{id}/small"),
        thumb: format!("https://img.test/{id}/thumb"),
    })
}

/// Builds `count` square photos named `{prefix}{index}`.
pub fn photos(prefix: &str, count: usize) -> Vec<Photo> {
    (0..count)
        .map(|i| photo(&format!("{prefix}{i}"), 400, 400))
        .collect()
}

fn page_slice(all: &[Photo], page: Page, per_page: PageSize) -> Vec<Photo> {
    let size = per_page.value() as usize;
    let start = (page.value() as usize - 1) * size;
    all.iter().skip(start).take(size).cloned().collect()
}

/// In-memory photo catalogue.
#[derive(Default)]
pub struct FakePhotoSource {
    listing: Mutex<Vec<Photo>>,
    searches: Mutex<HashMap<String, Vec<Photo>>>,
    by_id: Mutex<HashMap<PhotoId, Photo>>,
    failing_ids: Mutex<HashSet<PhotoId>>,
    fail_pages: AtomicBool,
    hang: AtomicBool,
    photo_calls: AtomicUsize,
    search_queries: Mutex<Vec<String>>,
}

impl FakePhotoSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, listing: Vec<Photo>) -> Self {
        self.register(&listing);
        *self.listing.lock().unwrap() = listing;
        self
    }

    pub fn with_search(self, query: &str, results: Vec<Photo>) -> Self {
        self.register(&results);
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), results);
        self
    }

    pub fn with_photos(self, photos: Vec<Photo>) -> Self {
        self.register(&photos);
        self
    }

    fn register(&self, photos: &[Photo]) {
        let mut by_id = self.by_id.lock().unwrap();
        for photo in photos {
            by_id.insert(photo.id.clone(), photo.clone());
        }
    }

    /// Makes lookups of `id` fail.
    pub fn fail_id(&self, id: &str) {
        self.failing_ids.lock().unwrap().insert(PhotoId::new(id));
    }

    /// Makes listing and search requests fail.
    pub fn set_fail_pages(&self, fail: bool) {
        self.fail_pages.store(fail, Ordering::SeqCst);
    }

    /// Makes every request wait until its token is cancelled.
    pub fn set_hang(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    pub fn photo_calls(&self) -> usize {
        self.photo_calls.load(Ordering::SeqCst)
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    async fn gate(&self, cancel: &CancellationToken) -> Result<()> {
        if self.hang.load(Ordering::SeqCst) {
            run_cancellable(cancel, std::future::pending::<Result<()>>()).await
        } else {
            crate::application::cancel::check(cancel)
        }
    }

    fn page_failure(&self) -> Result<()> {
        if self.fail_pages.load(Ordering::SeqCst) {
            Err(Error::Api {
                status: 503,
                message: "unavailable".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PhotoSource for FakePhotoSource {
    async fn list(
        &self,
        page: Page,
        per_page: PageSize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Photo>> {
        self.gate(cancel).await?;
        self.page_failure()?;
        Ok(page_slice(&self.listing.lock().unwrap(), page, per_page))
    }

    async fn search(
        &self,
        query: &str,
        page: Page,
        per_page: PageSize,
        cancel: &CancellationToken,
    ) -> Result<SearchPage> {
        self.search_queries.lock().unwrap().push(query.to_string());
        self.gate(cancel).await?;
        self.page_failure()?;
        let all = self
            .searches
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        let size = per_page.value();
        let total = all.len() as u32;
        Ok(SearchPage {
            total,
            total_pages: total.div_ceil(size),
            results: page_slice(&all, page, per_page),
        })
    }

    async fn photo(&self, id: &PhotoId, cancel: &CancellationToken) -> Result<Photo> {
        self.photo_calls.fetch_add(1, Ordering::SeqCst);
        self.gate(cancel).await?;
        if self.failing_ids.lock().unwrap().contains(id) {
            return Err(Error::Api {
                status: 404,
                message: format!("{id} not found"),
            });
        }
        self.by_id
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Api {
                status: 404,
                message: format!("{id} not found"),
            })
    }

    async fn download(&self, photo: &Photo, cancel: &CancellationToken) -> Result<Vec<u8>> {
        self.gate(cancel).await?;
        Ok(format!("jpeg:{}", photo.id).into_bytes())
    }
}

/// Stored row of the fake interaction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeRow {
    pub id: i64,
    pub image_id: PhotoId,
    pub session_id: SessionId,
    pub likes: LikeFlag,
    pub downloads: DownloadCount,
}

/// In-memory interaction table.
#[derive(Default)]
pub struct FakeInteractionStore {
    rows: Mutex<Vec<FakeRow>>,
    next_id: AtomicUsize,
    deny_delete: AtomicBool,
    fail_all: AtomicBool,
    writes: AtomicUsize,
}

impl FakeInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes row deletion fail with a permission error.
    pub fn set_deny_delete(&self, deny: bool) {
        self.deny_delete.store(deny, Ordering::SeqCst);
    }

    /// Makes every call fail with a transport error.
    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<FakeRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn row_for(&self, image_id: &str) -> Option<FakeRow> {
        self.rows()
            .into_iter()
            .find(|row| row.image_id.as_str() == image_id)
    }

    /// Number of insert, update and delete calls received.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn guard(&self) -> StoreResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            Err(StoreError::Transport("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InteractionStore for FakeInteractionStore {
    async fn find(
        &self,
        image_id: &PhotoId,
        session: &SessionId,
    ) -> StoreResult<Option<Interaction>> {
        self.guard()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| &row.image_id == image_id && &row.session_id == session)
            .map(|row| Interaction {
                row_id: RowId(row.id),
                likes: row.likes,
                downloads: row.downloads,
            }))
    }

    async fn insert(&self, row: &NewInteraction) -> StoreResult<()> {
        self.guard()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1;
        self.rows.lock().unwrap().push(FakeRow {
            id,
            image_id: row.image_id.clone(),
            session_id: row.session_id.clone(),
            likes: row.likes,
            downloads: row.downloads,
        });
        Ok(())
    }

    async fn update(&self, row_id: RowId, patch: InteractionPatch) -> StoreResult<()> {
        self.guard()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|row| row.id == row_id.0) {
            if let Some(likes) = patch.likes {
                row.likes = likes;
            }
            if let Some(downloads) = patch.downloads {
                row.downloads = downloads;
            }
        }
        Ok(())
    }

    async fn delete(&self, row_id: RowId) -> StoreResult<()> {
        self.guard()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.deny_delete.load(Ordering::SeqCst) {
            return Err(StoreError::PermissionDenied("delete not allowed".into()));
        }
        self.rows.lock().unwrap().retain(|row| row.id != row_id.0);
        Ok(())
    }

    async fn image_ids(
        &self,
        session: &SessionId,
        kind: InteractionKind,
    ) -> StoreResult<Vec<PhotoId>> {
        self.guard()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| &row.session_id == session)
            .filter(|row| match kind {
                InteractionKind::Like => row.likes.is_liked(),
                InteractionKind::Download => !row.downloads.is_zero(),
            })
            .map(|row| row.image_id.clone())
            .collect())
    }
}
