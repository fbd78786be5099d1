// SPDX-License-Identifier: MPL-2.0
//! Remote adapters selected from the configuration.

use crate::app::config::Config;
use crate::application::port::{InteractionStore, PhotoSource};
use crate::domain::interaction::SessionId;
use crate::error::{Error, Result};
use crate::infrastructure::{SupabaseStore, UnconfiguredStore, UnsplashClient};
use std::sync::Arc;

/// Ports the shell runs its effects against.
#[derive(Clone)]
pub struct Services {
    pub photos: Arc<dyn PhotoSource>,
    pub store: Arc<dyn InteractionStore>,
    pub session: SessionId,
}

impl Services {
    pub fn new(
        photos: Arc<dyn PhotoSource>,
        store: Arc<dyn InteractionStore>,
        session: SessionId,
    ) -> Self {
        Self {
            photos,
            store,
            session,
        }
    }

    /// Builds the HTTP adapters.
    ///
    /// Without store credentials likes and downloads are not persisted: every
    /// store call reports `NotConfigured` and the rest of the app keeps working.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the photo API key is missing or a key
    /// cannot be used as a header value.
    pub fn from_config(config: &Config, session: SessionId) -> Result<Self> {
        let key = config
            .api
            .resolved_photo_api_key()
            .ok_or_else(|| Error::Config("photo API key is not set".into()))?;
        let photos = Arc::new(UnsplashClient::new(&config.api.photo_api_url, &key)?);

        let store: Arc<dyn InteractionStore> = match (
            config.api.resolved_store_url(),
            config.api.resolved_store_key(),
        ) {
            (Some(url), Some(key)) => Arc::new(SupabaseStore::new(
                &url,
                &key,
                &config.api.interactions_table,
            )?),
            _ => {
                tracing::warn!("interaction store not configured, likes and downloads are not saved");
                Arc::new(UnconfiguredStore)
            }
        };

        Ok(Self::new(photos, store, session))
    }
}
