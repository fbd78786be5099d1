// SPDX-License-Identifier: MPL-2.0
//! Like and download rules on top of the interaction store.
//!
//! # Like transitions
//!
//! | stored row              | request | store calls                      |
//! |-------------------------|---------|----------------------------------|
//! | none                    | like    | insert `likes = 1, downloads = 0` |
//! | none                    | unlike  | nothing                          |
//! | any                     | like    | update `likes = 1`               |
//! | `downloads == 0`        | unlike  | delete (update `likes = 0` on failure) |
//! | `downloads > 0`         | unlike  | update `likes = 0`               |
//!
//! Downloads insert `downloads = 1` on the first download and increment the
//! stored count afterwards. Every successful change is published on the
//! [`InteractionBus`].

use crate::application::events::{InteractionBus, InteractionEvent};
use crate::application::port::InteractionStore;
use crate::domain::interaction::{
    DownloadCount, Interaction, InteractionKind, InteractionPatch, LikeFlag, NewInteraction,
    SessionId,
};
use crate::domain::photo::PhotoId;
use crate::error::Result;
use std::sync::Arc;

/// Persists likes and downloads for one session.
#[derive(Clone)]
pub struct InteractionService {
    store: Arc<dyn InteractionStore>,
    session: SessionId,
    bus: InteractionBus,
}

impl InteractionService {
    pub fn new(store: Arc<dyn InteractionStore>, session: SessionId, bus: InteractionBus) -> Self {
        Self {
            store,
            session,
            bus,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    #[must_use]
    pub fn bus(&self) -> &InteractionBus {
        &self.bus
    }

    /// Returns the stored interaction for `image_id`, if any.
    pub async fn interaction(&self, image_id: &PhotoId) -> Result<Option<Interaction>> {
        self.store
            .find(image_id, &self.session)
            .await
            .map_err(|e| {
                tracing::error!(image_id = %image_id, error = %e, "failed to read interaction");
                e.into()
            })
    }

    /// Marks `image_id` as liked or not liked.
    pub async fn set_like(&self, image_id: &PhotoId, liked: bool) -> Result<()> {
        let existing = self.interaction(image_id).await?;

        match (existing, liked) {
            (None, true) => {
                self.store
                    .insert(&NewInteraction::first_like(
                        image_id.clone(),
                        self.session.clone(),
                    ))
                    .await?;
            }
            (None, false) => {
                tracing::debug!(image_id = %image_id, "unlike without stored row, nothing to do");
                return Ok(());
            }
            (Some(row), true) => {
                self.store
                    .update(row.row_id, InteractionPatch::likes(LikeFlag::LIKED))
                    .await?;
            }
            (Some(row), false) if row.downloads.is_zero() => {
                if let Err(e) = self.store.delete(row.row_id).await {
                    tracing::warn!(
                        image_id = %image_id,
                        error = %e,
                        "row delete refused, clearing the like instead"
                    );
                    self.store
                        .update(row.row_id, InteractionPatch::likes(LikeFlag::NOT_LIKED))
                        .await?;
                }
            }
            (Some(row), false) => {
                self.store
                    .update(row.row_id, InteractionPatch::likes(LikeFlag::NOT_LIKED))
                    .await?;
            }
        }

        self.bus.publish(InteractionEvent::LikesChanged {
            image_id: image_id.clone(),
            liked,
        });
        Ok(())
    }

    /// Records one more download of `image_id` and returns the new count.
    pub async fn increment_download(&self, image_id: &PhotoId) -> Result<DownloadCount> {
        let count = match self.interaction(image_id).await? {
            None => {
                let row = NewInteraction::first_download(image_id.clone(), self.session.clone());
                let count = row.downloads;
                self.store.insert(&row).await?;
                count
            }
            Some(row) => {
                let count = row.downloads.incremented();
                self.store
                    .update(row.row_id, InteractionPatch::downloads(count))
                    .await?;
                count
            }
        };

        self.bus.publish(InteractionEvent::DownloadsChanged {
            image_id: image_id.clone(),
        });
        Ok(count)
    }

    /// Ids of the photos liked by this session.
    pub async fn liked_ids(&self) -> Result<Vec<PhotoId>> {
        self.image_ids(InteractionKind::Like).await
    }

    /// Ids of the photos downloaded at least once by this session.
    pub async fn downloaded_ids(&self) -> Result<Vec<PhotoId>> {
        self.image_ids(InteractionKind::Download).await
    }

    pub async fn image_ids(&self, kind: InteractionKind) -> Result<Vec<PhotoId>> {
        Ok(self.store.image_ids(&self.session, kind).await?)
    }
}
