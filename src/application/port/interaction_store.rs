// SPDX-License-Identifier: MPL-2.0
//! Interaction store port.
//!
//! Row-level access to the remote interaction table. The like/download
//! rules live in [`InteractionService`](crate::application::interactions::InteractionService);
//! implementations only move rows.

use crate::domain::interaction::{
    Interaction, InteractionKind, InteractionPatch, NewInteraction, RowId, SessionId,
};
use crate::domain::photo::PhotoId;
use crate::error::StoreError;
use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Returns the row for `(image_id, session)`, if any.
    async fn find(&self, image_id: &PhotoId, session: &SessionId)
        -> StoreResult<Option<Interaction>>;

    async fn insert(&self, row: &NewInteraction) -> StoreResult<()>;

    async fn update(&self, row_id: RowId, patch: InteractionPatch) -> StoreResult<()>;

    async fn delete(&self, row_id: RowId) -> StoreResult<()>;

    /// Returns the image ids of the session that are liked
    /// ([`InteractionKind::Like`]) or downloaded at least once
    /// ([`InteractionKind::Download`]).
    async fn image_ids(
        &self,
        session: &SessionId,
        kind: InteractionKind,
    ) -> StoreResult<Vec<PhotoId>>;
}
