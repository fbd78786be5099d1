// SPDX-License-Identifier: MPL-2.0
//! Resolution of liked and downloaded photos.
//!
//! The interaction store only knows image ids. The loader turns them into
//! photos by looking each id up on the photo source, in batches: lookups
//! inside a batch run concurrently, batches run one after another and each
//! finished batch is handed to the caller so the grid can fill in
//! progressively.
//!
//! Two caches sit in front of the photo source:
//!
//! - a per-category list cache, dropped when the interaction bus reports a
//!   change of the matching kind
//! - a bounded LRU of photos resolved by id, never invalidated since photo
//!   records do not change

use crate::application::cancel::{self, CancellationToken};
use crate::application::events::InteractionEvent;
use crate::application::interactions::InteractionService;
use crate::application::port::PhotoSource;
use crate::domain::gallery::BatchSize;
use crate::domain::interaction::InteractionKind;
use crate::domain::photo::{Photo, PhotoId};
use crate::error::{Error, Result};
use futures_util::future::join_all;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Result of a completed load.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractedLoad {
    pub photos: Vec<Photo>,
    /// `true` when the list came from the category cache and no chunk was
    /// reported.
    pub from_cache: bool,
}

struct LoaderState {
    lists: HashMap<InteractionKind, Vec<Photo>>,
    resolved: LruCache<PhotoId, Photo>,
    invalidations: broadcast::Receiver<InteractionEvent>,
}

impl LoaderState {
    /// Applies every event queued on the bus since the last call and
    /// returns the kinds that were invalidated.
    fn drain_invalidations(&mut self) -> Vec<InteractionKind> {
        let mut touched = Vec::new();
        loop {
            match self.invalidations.try_recv() {
                Ok(event) => {
                    self.lists.remove(&event.kind());
                    touched.push(event.kind());
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "invalidation receiver lagged, dropping all lists");
                    self.lists.clear();
                    touched.extend([InteractionKind::Like, InteractionKind::Download]);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        touched
    }
}

/// Loads and caches the photos of the liked and downloaded categories.
pub struct InteractedPhotosLoader {
    photos: Arc<dyn PhotoSource>,
    interactions: InteractionService,
    batch_size: BatchSize,
    state: Mutex<LoaderState>,
}

impl InteractedPhotosLoader {
    /// Creates a loader.
    ///
    /// `photo_cache_entries` bounds the by-id cache; zero is treated as one.
    pub fn new(
        photos: Arc<dyn PhotoSource>,
        interactions: InteractionService,
        batch_size: BatchSize,
        photo_cache_entries: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(photo_cache_entries).unwrap_or(NonZeroUsize::MIN);
        let invalidations = interactions.bus().subscribe();
        Self {
            photos,
            interactions,
            batch_size,
            state: Mutex::new(LoaderState {
                lists: HashMap::new(),
                resolved: LruCache::new(capacity),
                invalidations,
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut LoaderState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Returns the cached list for `kind`, if still valid.
    #[must_use]
    pub fn cached(&self, kind: InteractionKind) -> Option<Vec<Photo>> {
        self.with_state(|state| {
            state.drain_invalidations();
            state.lists.get(&kind).cloned()
        })
    }

    /// Drops the cached list for `kind`.
    pub fn invalidate(&self, kind: InteractionKind) {
        self.with_state(|state| {
            state.lists.remove(&kind);
        });
    }

    /// Loads the photos of `kind`.
    ///
    /// Each resolved batch is passed to `on_chunk` in store order. A cache hit
    /// returns immediately without calling `on_chunk`. Failing lookups are
    /// skipped; a failing id query yields an empty, uncached list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] when `cancel` fires. Nothing is cached in
    /// that case.
    pub async fn load<F>(
        &self,
        kind: InteractionKind,
        cancel: &CancellationToken,
        mut on_chunk: F,
    ) -> Result<InteractedLoad>
    where
        F: FnMut(&[Photo]) + Send,
    {
        if let Some(photos) = self.cached(kind) {
            return Ok(InteractedLoad {
                photos,
                from_cache: true,
            });
        }

        let ids = match self.interactions.image_ids(kind).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(?kind, error = %e, "failed to list interacted ids");
                return Ok(InteractedLoad {
                    photos: Vec::new(),
                    from_cache: false,
                });
            }
        };

        let mut loaded = Vec::with_capacity(ids.len());
        for batch in ids.chunks(self.batch_size.value()) {
            cancel::check(cancel)?;
            let chunk = self.resolve_batch(batch, cancel).await?;
            if !chunk.is_empty() {
                on_chunk(&chunk);
            }
            loaded.extend(chunk);
        }
        cancel::check(cancel)?;

        self.with_state(|state| {
            // A change published while loading makes this result stale.
            if state.drain_invalidations().contains(&kind) {
                tracing::debug!(?kind, "interactions changed during load, not caching");
            } else {
                state.lists.insert(kind, loaded.clone());
            }
        });
        tracing::debug!(?kind, count = loaded.len(), "interacted photos loaded");

        Ok(InteractedLoad {
            photos: loaded,
            from_cache: false,
        })
    }

    async fn resolve_batch(&self, ids: &[PhotoId], cancel: &CancellationToken) -> Result<Vec<Photo>> {
        let known: Vec<Option<Photo>> = self.with_state(|state| {
            ids.iter()
                .map(|id| state.resolved.get(id).cloned())
                .collect()
        });

        let lookups = ids.iter().zip(known).map(|(id, known)| async move {
            match known {
                Some(photo) => Ok(photo),
                None => self.photos.photo(id, cancel).await,
            }
        });
        let results = join_all(lookups).await;

        let mut chunk = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(photo) => chunk.push(photo),
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => tracing::warn!(image_id = %id, error = %e, "skipping unresolved photo"),
            }
        }

        self.with_state(|state| {
            for photo in &chunk {
                state.resolved.put(photo.id.clone(), photo.clone());
            }
        });
        Ok(chunk)
    }
}
