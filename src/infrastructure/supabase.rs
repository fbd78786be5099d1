// SPDX-License-Identifier: MPL-2.0
//! Interaction store adapter for a PostgREST endpoint (Supabase).
//!
//! Rows live in one table with the columns `id`, `image_id`, `session_id`,
//! `likes` and `downloads`. Filters use PostgREST operators (`eq.`, `gt.`)
//! in the query string; every request carries the project key both as
//! `apikey` and as a bearer token.

use crate::app::config::USER_AGENT;
use crate::application::port::{InteractionStore, StoreResult};
use crate::domain::interaction::{
    DownloadCount, Interaction, InteractionKind, InteractionPatch, LikeFlag, NewInteraction, RowId,
    SessionId,
};
use crate::domain::photo::PhotoId;
use crate::error::{Error, Result, StoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

const PREFER: &str = "prefer";
const RETURN_MINIMAL: &str = "return=minimal";
const RETURN_REPRESENTATION: &str = "return=representation";

#[derive(Debug, Deserialize)]
struct RowDto {
    id: i64,
    #[serde(default)]
    likes: Option<i64>,
    #[serde(default)]
    downloads: Option<i64>,
}

impl From<RowDto> for Interaction {
    fn from(row: RowDto) -> Self {
        Self {
            row_id: RowId(row.id),
            likes: LikeFlag::from_stored(row.likes.unwrap_or(0)),
            downloads: DownloadCount::from_stored(row.downloads.unwrap_or(0)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageIdDto {
    image_id: String,
}

#[derive(Debug, Serialize)]
struct InsertDto<'a> {
    image_id: &'a str,
    session_id: &'a str,
    likes: i64,
    downloads: i64,
}

impl<'a> From<&'a NewInteraction> for InsertDto<'a> {
    fn from(row: &'a NewInteraction) -> Self {
        Self {
            image_id: row.image_id.as_str(),
            session_id: row.session_id.as_str(),
            likes: row.likes.stored(),
            downloads: i64::from(row.downloads.value()),
        }
    }
}

#[derive(Debug, Serialize)]
struct PatchDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    downloads: Option<i64>,
}

impl From<InteractionPatch> for PatchDto {
    fn from(patch: InteractionPatch) -> Self {
        Self {
            likes: patch.likes.map(LikeFlag::stored),
            downloads: patch.downloads.map(|count| i64::from(count.value())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PostgrestErrorDto {
    #[serde(default)]
    message: String,
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

/// Turns a non-success reply into a [`StoreError`].
fn status_error(code: u16, body: &str) -> StoreError {
    let message = serde_json::from_str::<PostgrestErrorDto>(body)
        .ok()
        .map(|dto| dto.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    StoreError::from_status(code, message)
}

/// Column filter selecting rows that count for `kind`.
fn kind_filter(kind: InteractionKind) -> (&'static str, &'static str) {
    match kind {
        InteractionKind::Like => ("likes", "gt.0"),
        InteractionKind::Download => ("downloads", "gt.0"),
    }
}

/// PostgREST client bound to one table.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    http: reqwest::Client,
    table_url: String,
}

impl SupabaseStore {
    /// Creates a store for `table` on the project at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the key is not a valid header value.
    pub fn new(base_url: &str, key: &str, table: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let apikey = HeaderValue::from_str(key)
            .map_err(|e| Error::Config(format!("invalid store key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| Error::Config(format!("invalid store key: {e}")))?;
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            table_url: format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table),
        })
    }

    #[must_use]
    pub fn table_url(&self) -> &str {
        &self.table_url
    }

    /// Sends `request` and returns the body of a successful reply.
    async fn execute(&self, request: reqwest::RequestBuilder) -> StoreResult<String> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status.as_u16(), &body))
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> StoreResult<T> {
        serde_json::from_str(body)
            .map_err(|e| StoreError::Transport(format!("invalid store response: {e}")))
    }
}

#[async_trait]
impl InteractionStore for SupabaseStore {
    async fn find(
        &self,
        image_id: &PhotoId,
        session: &SessionId,
    ) -> StoreResult<Option<Interaction>> {
        let request = self.http.get(&self.table_url).query(&[
            ("select", "id,likes,downloads".to_string()),
            ("image_id", eq(image_id)),
            ("session_id", eq(session)),
            ("limit", "1".to_string()),
        ]);
        let rows: Vec<RowDto> = Self::decode(&self.execute(request).await?)?;
        Ok(rows.into_iter().next().map(Interaction::from))
    }

    async fn insert(&self, row: &NewInteraction) -> StoreResult<()> {
        let request = self
            .http
            .post(&self.table_url)
            .header(PREFER, RETURN_MINIMAL)
            .json(&InsertDto::from(row));
        self.execute(request).await.map(drop)
    }

    async fn update(&self, row_id: RowId, patch: InteractionPatch) -> StoreResult<()> {
        let request = self
            .http
            .patch(&self.table_url)
            .query(&[("id", eq(row_id.0))])
            .header(PREFER, RETURN_MINIMAL)
            .json(&PatchDto::from(patch));
        self.execute(request).await.map(drop)
    }

    async fn delete(&self, row_id: RowId) -> StoreResult<()> {
        // Row-level policies silently filter a refused delete, so ask for the
        // deleted rows and treat an empty reply as a refusal.
        let request = self
            .http
            .delete(&self.table_url)
            .query(&[("id", eq(row_id.0))])
            .header(PREFER, RETURN_REPRESENTATION);
        let deleted: Vec<serde_json::Value> = Self::decode(&self.execute(request).await?)?;
        if deleted.is_empty() {
            return Err(StoreError::PermissionDenied(format!(
                "row {} was not deleted",
                row_id.0
            )));
        }
        Ok(())
    }

    async fn image_ids(
        &self,
        session: &SessionId,
        kind: InteractionKind,
    ) -> StoreResult<Vec<PhotoId>> {
        let (column, filter) = kind_filter(kind);
        let request = self.http.get(&self.table_url).query(&[
            ("select", "image_id".to_string()),
            ("session_id", eq(session)),
            (column, filter.to_string()),
        ]);
        let rows: Vec<ImageIdDto> = Self::decode(&self.execute(request).await?)?;
        Ok(rows
            .into_iter()
            .map(|row| PhotoId::new(row.image_id))
            .collect())
    }
}

/// Store used when no URL or key is configured. Every call fails with
/// [`StoreError::NotConfigured`], which keeps browsing usable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredStore;

#[async_trait]
impl InteractionStore for UnconfiguredStore {
    async fn find(&self, _: &PhotoId, _: &SessionId) -> StoreResult<Option<Interaction>> {
        Err(StoreError::NotConfigured)
    }

    async fn insert(&self, _: &NewInteraction) -> StoreResult<()> {
        Err(StoreError::NotConfigured)
    }

    async fn update(&self, _: RowId, _: InteractionPatch) -> StoreResult<()> {
        Err(StoreError::NotConfigured)
    }

    async fn delete(&self, _: RowId) -> StoreResult<()> {
        Err(StoreError::NotConfigured)
    }

    async fn image_ids(&self, _: &SessionId, _: InteractionKind) -> StoreResult<Vec<PhotoId>> {
        Err(StoreError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_is_built_from_base_and_table() {
        let store = SupabaseStore::new("https://xyz.supabase.co/", "anon", "interactions").unwrap();
        assert_eq!(store.table_url(), "https://xyz.supabase.co/rest/v1/interactions");
    }

    #[test]
    fn row_dto_maps_null_counters_to_zero() {
        let rows: Vec<RowDto> =
            serde_json::from_str(r#"[{"id":7,"likes":null,"downloads":3}]"#).unwrap();
        let interaction = Interaction::from(rows.into_iter().next().unwrap());
        assert_eq!(interaction.row_id, RowId(7));
        assert!(!interaction.likes.is_liked());
        assert_eq!(interaction.downloads.value(), 3);
    }

    #[test]
    fn insert_body_uses_stored_representation() {
        let row = NewInteraction::first_like(PhotoId::new("img"), SessionId::new("s"));
        let json = serde_json::to_value(InsertDto::from(&row)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"image_id":"img","session_id":"s","likes":1,"downloads":0})
        );
    }

    #[test]
    fn patch_body_only_contains_changed_columns() {
        let json =
            serde_json::to_value(PatchDto::from(InteractionPatch::likes(LikeFlag::NOT_LIKED)))
                .unwrap();
        assert_eq!(json, serde_json::json!({"likes":0}));

        let json = serde_json::to_value(PatchDto::from(InteractionPatch::downloads(
            DownloadCount::new(4),
        )))
        .unwrap();
        assert_eq!(json, serde_json::json!({"downloads":4}));
    }

    #[test]
    fn status_error_extracts_postgrest_message() {
        let err = status_error(
            403,
            r#"{"code":"42501","message":"new row violates row-level security policy"}"#,
        );
        assert_eq!(
            err,
            StoreError::PermissionDenied("new row violates row-level security policy".into())
        );

        let err = status_error(500, "gateway timeout\n");
        assert_eq!(
            err,
            StoreError::Status {
                code: 500,
                body: "gateway timeout".into()
            }
        );
    }

    #[test]
    fn kind_filters_select_positive_counters() {
        assert_eq!(kind_filter(InteractionKind::Like), ("likes", "gt.0"));
        assert_eq!(kind_filter(InteractionKind::Download), ("downloads", "gt.0"));
    }

    #[test]
    fn filters_use_eq_operator() {
        assert_eq!(eq(PhotoId::new("abc")), "eq.abc");
        assert_eq!(eq(12), "eq.12");
    }

    #[tokio::test]
    async fn unconfigured_store_reports_not_configured() {
        let store = UnconfiguredStore;
        let err = store
            .image_ids(&SessionId::new("s"), InteractionKind::Like)
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotConfigured);
    }
}
