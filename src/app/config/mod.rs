// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Language
//! - `[api]` - Photo API and interaction store endpoints and keys
//! - `[gallery]` - Pagination, debounce and prefetch distance
//! - `[layout]` - Masonry container width, gap and filler blocks
//! - `[lightbox]` - Hover zoom, reduced motion and download directory
//! - `[diagnostics]` - Event buffer capacity
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Set `MOSAIC_LENS_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Secrets
//!
//! API keys may be kept out of the file: `MOSAIC_LENS_PHOTO_API_KEY`,
//! `MOSAIC_LENS_STORE_URL` and `MOSAIC_LENS_STORE_KEY` take precedence over
//! the `[api]` values.
//!
//! # Examples
//!
//! ```no_run
//! use mosaic_lens::app::config::{self, Config};
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (mut config, _warning) = config::load();
//!
//! // Modify a setting
//! config.general.language = Some("pt-BR".to_string());
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::diagnostics::BufferCapacity;
use crate::domain::gallery::{BatchSize, PageSize};
use crate::error::{Error, Result};
use crate::layout::{ColumnBreakpoints, FillerSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// Environment variable holding the photo API access key.
pub const ENV_PHOTO_API_KEY: &str = "MOSAIC_LENS_PHOTO_API_KEY";

/// Environment variable holding the interaction store base URL.
pub const ENV_STORE_URL: &str = "MOSAIC_LENS_STORE_URL";

/// Environment variable holding the interaction store key.
pub const ENV_STORE_KEY: &str = "MOSAIC_LENS_STORE_KEY";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "pt-BR").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Remote endpoints and credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the photo API.
    #[serde(default = "default_photo_api_url")]
    pub photo_api_url: String,

    /// Photo API access key (overridden by `MOSAIC_LENS_PHOTO_API_KEY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_api_key: Option<String>,

    /// Base URL of the interaction store (overridden by `MOSAIC_LENS_STORE_URL`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,

    /// Interaction store key (overridden by `MOSAIC_LENS_STORE_KEY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_key: Option<String>,

    /// Name of the interaction table.
    #[serde(default = "default_interactions_table")]
    pub interactions_table: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            photo_api_url: default_photo_api_url(),
            photo_api_key: None,
            store_url: None,
            store_key: None,
            interactions_table: default_interactions_table(),
        }
    }
}

impl ApiConfig {
    /// Photo API key, preferring the environment.
    #[must_use]
    pub fn resolved_photo_api_key(&self) -> Option<String> {
        env_or(ENV_PHOTO_API_KEY, self.photo_api_key.as_ref())
    }

    /// Interaction store URL, preferring the environment.
    #[must_use]
    pub fn resolved_store_url(&self) -> Option<String> {
        env_or(ENV_STORE_URL, self.store_url.as_ref())
    }

    /// Interaction store key, preferring the environment.
    #[must_use]
    pub fn resolved_store_key(&self) -> Option<String> {
        env_or(ENV_STORE_KEY, self.store_key.as_ref())
    }
}

/// Gallery pagination and input settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryConfig {
    /// Results requested per page.
    #[serde(default = "default_per_page", skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Delay before a typed query is applied (milliseconds).
    #[serde(
        default = "default_search_debounce_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub search_debounce_ms: Option<u64>,

    /// Distance to the bottom (pixels) that triggers the next page.
    #[serde(
        default = "default_prefetch_distance_px",
        skip_serializing_if = "Option::is_none"
    )]
    pub prefetch_distance_px: Option<f32>,

    /// Concurrent by-id lookups when resolving liked/downloaded photos.
    #[serde(
        default = "default_interacted_batch_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub interacted_batch_size: Option<usize>,

    /// Capacity of the resolved-photo cache.
    #[serde(
        default = "default_photo_cache_entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_cache_entries: Option<usize>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            search_debounce_ms: default_search_debounce_ms(),
            prefetch_distance_px: default_prefetch_distance_px(),
            interacted_batch_size: default_interacted_batch_size(),
            photo_cache_entries: default_photo_cache_entries(),
        }
    }
}

impl GalleryConfig {
    #[must_use]
    pub fn page_size(&self) -> PageSize {
        PageSize::new(self.per_page.unwrap_or(DEFAULT_PER_PAGE))
    }

    #[must_use]
    pub fn search_debounce(&self) -> Duration {
        let ms = self
            .search_debounce_ms
            .unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS)
            .clamp(MIN_SEARCH_DEBOUNCE_MS, MAX_SEARCH_DEBOUNCE_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn prefetch_distance(&self) -> f32 {
        self.prefetch_distance_px
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(DEFAULT_PREFETCH_DISTANCE_PX)
    }

    #[must_use]
    pub fn batch_size(&self) -> BatchSize {
        BatchSize::new(
            self.interacted_batch_size
                .unwrap_or(DEFAULT_INTERACTED_BATCH_SIZE),
        )
    }

    #[must_use]
    pub fn photo_cache_entries(&self) -> usize {
        self.photo_cache_entries
            .unwrap_or(DEFAULT_PHOTO_CACHE_ENTRIES)
            .clamp(MIN_PHOTO_CACHE_ENTRIES, MAX_PHOTO_CACHE_ENTRIES)
    }
}

/// Masonry layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    /// Width of the grid container (pixels).
    #[serde(
        default = "default_container_width_px",
        skip_serializing_if = "Option::is_none"
    )]
    pub container_width_px: Option<f32>,

    /// Fixed column count; derived from the container width when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,

    /// Gap between columns and stacked photos (pixels).
    #[serde(default = "default_gap_px", skip_serializing_if = "Option::is_none")]
    pub gap_px: Option<f32>,

    /// Shortfall at or below which no filler block is emitted (pixels).
    #[serde(
        default = "default_min_filler_px",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_filler_px: Option<f32>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_width_px: default_container_width_px(),
            columns: None,
            gap_px: default_gap_px(),
            min_filler_px: default_min_filler_px(),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn container_width(&self) -> f32 {
        self.container_width_px
            .filter(|w| w.is_finite() && *w >= 0.0)
            .unwrap_or(DEFAULT_CONTAINER_WIDTH_PX)
    }

    #[must_use]
    pub fn gap(&self) -> f32 {
        self.gap_px
            .filter(|g| g.is_finite() && *g >= 0.0)
            .unwrap_or(DEFAULT_GAP_PX)
    }

    /// Column count: the fixed value if set, otherwise from breakpoints.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns
            .unwrap_or_else(|| ColumnBreakpoints::default().column_count(self.container_width()))
            .max(1)
    }

    #[must_use]
    pub fn filler_spec(&self) -> FillerSpec {
        let min_height = self
            .min_filler_px
            .filter(|m| m.is_finite() && *m >= 0.0)
            .unwrap_or(DEFAULT_MIN_FILLER_PX);
        FillerSpec {
            min_height,
            ..FillerSpec::default()
        }
    }
}

/// Lightbox settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LightboxConfig {
    /// Suppress the like burst and hover scaling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,

    /// Scale applied while hovering the photo.
    #[serde(
        default = "default_hover_zoom_factor",
        skip_serializing_if = "Option::is_none"
    )]
    pub hover_zoom_factor: Option<f32>,

    /// Directory where downloaded photos are written (defaults to the
    /// platform download directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            reduced_motion: Some(false),
            hover_zoom_factor: default_hover_zoom_factor(),
            download_dir: None,
        }
    }
}

impl LightboxConfig {
    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion.unwrap_or(false)
    }

    #[must_use]
    pub fn hover_zoom_factor(&self) -> f32 {
        self.hover_zoom_factor
            .unwrap_or(DEFAULT_HOVER_ZOOM_FACTOR)
            .clamp(MIN_HOVER_ZOOM_FACTOR, MAX_HOVER_ZOOM_FACTOR)
    }

    /// Download directory, falling back to the platform download folder and
    /// then the current directory.
    #[must_use]
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Number of events kept in memory.
    #[serde(
        default = "default_diagnostics_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub buffer_capacity: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_diagnostics_capacity(),
        }
    }
}

impl DiagnosticsConfig {
    #[must_use]
    pub fn capacity(&self) -> BufferCapacity {
        BufferCapacity::new(
            self.buffer_capacity
                .unwrap_or(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY),
        )
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub lightbox: LightboxConfig,

    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_photo_api_url() -> String {
    DEFAULT_PHOTO_API_URL.to_string()
}

fn default_interactions_table() -> String {
    DEFAULT_INTERACTIONS_TABLE.to_string()
}

fn default_per_page() -> Option<u32> {
    Some(DEFAULT_PER_PAGE)
}

fn default_search_debounce_ms() -> Option<u64> {
    Some(DEFAULT_SEARCH_DEBOUNCE_MS)
}

fn default_prefetch_distance_px() -> Option<f32> {
    Some(DEFAULT_PREFETCH_DISTANCE_PX)
}

fn default_interacted_batch_size() -> Option<usize> {
    Some(DEFAULT_INTERACTED_BATCH_SIZE)
}

fn default_photo_cache_entries() -> Option<usize> {
    Some(DEFAULT_PHOTO_CACHE_ENTRIES)
}

fn default_container_width_px() -> Option<f32> {
    Some(DEFAULT_CONTAINER_WIDTH_PX)
}

fn default_gap_px() -> Option<f32> {
    Some(DEFAULT_GAP_PX)
}

fn default_min_filler_px() -> Option<f32> {
    Some(DEFAULT_MIN_FILLER_PX)
}

fn default_hover_zoom_factor() -> Option<f32> {
    Some(DEFAULT_HOVER_ZOOM_FACTOR)
}

fn default_diagnostics_capacity() -> Option<usize> {
    Some(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY)
}

fn env_or(key: &str, fallback: Option<&String>) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => fallback.filter(|v| !v.trim().is_empty()).cloned(),
    }
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with the i18n key of a warning explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "falling back to default config");
                    return (
                        Config::default(),
                        Some("notification-config-load-error".to_string()),
                    );
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            general: GeneralConfig {
                language: Some("pt-BR".to_string()),
            },
            api: ApiConfig {
                store_url: Some("https://store.example".to_string()),
                ..ApiConfig::default()
            },
            gallery: GalleryConfig {
                per_page: Some(12),
                ..GalleryConfig::default()
            },
            layout: LayoutConfig {
                columns: Some(3),
                ..LayoutConfig::default()
            },
            lightbox: LightboxConfig {
                reduced_motion: Some(true),
                ..LightboxConfig::default()
            },
            diagnostics: DiagnosticsConfig::default(),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let result = load_from_path(&config_path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_with_override_falls_back_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[gallery\nper_page = ")
            .expect("failed to write invalid toml");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
    }

    #[test]
    fn load_with_override_missing_file_uses_defaults_silently() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[gallery]\nper_page = 10\n").expect("failed to write");

        let loaded = load_from_path(&config_path).expect("failed to load config");
        assert_eq!(loaded.gallery.per_page, Some(10));
        assert_eq!(
            loaded.gallery.search_debounce_ms,
            Some(DEFAULT_SEARCH_DEBOUNCE_MS)
        );
        assert_eq!(loaded.api.photo_api_url, DEFAULT_PHOTO_API_URL);
        assert_eq!(loaded.layout.gap_px, Some(DEFAULT_GAP_PX));
    }

    #[test]
    fn typed_accessors_clamp_values() {
        let gallery = GalleryConfig {
            per_page: Some(500),
            search_debounce_ms: Some(60_000),
            prefetch_distance_px: Some(-1.0),
            interacted_batch_size: Some(0),
            photo_cache_entries: Some(1),
        };
        assert_eq!(gallery.page_size().value(), 30);
        assert_eq!(
            gallery.search_debounce(),
            Duration::from_millis(MAX_SEARCH_DEBOUNCE_MS)
        );
        assert_eq!(gallery.prefetch_distance(), DEFAULT_PREFETCH_DISTANCE_PX);
        assert_eq!(gallery.batch_size().value(), 1);
        assert_eq!(gallery.photo_cache_entries(), MIN_PHOTO_CACHE_ENTRIES);
    }

    #[test]
    fn column_count_uses_breakpoints_unless_fixed() {
        let mut layout = LayoutConfig::default();
        assert_eq!(layout.column_count(), 4);
        layout.container_width_px = Some(700.0);
        assert_eq!(layout.column_count(), 2);
        layout.columns = Some(0);
        assert_eq!(layout.column_count(), 1);
    }

    #[test]
    fn filler_spec_uses_configured_minimum() {
        let layout = LayoutConfig {
            min_filler_px: Some(80.0),
            ..LayoutConfig::default()
        };
        assert_eq!(layout.filler_spec().min_height, 80.0);
        assert_eq!(layout.filler_spec().base_height, DEFAULT_FILLER_BASE_PX);
    }

    #[test]
    fn environment_overrides_api_key() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let api = ApiConfig {
            photo_api_key: Some("from-file".into()),
            ..ApiConfig::default()
        };

        std::env::remove_var(ENV_PHOTO_API_KEY);
        assert_eq!(api.resolved_photo_api_key().as_deref(), Some("from-file"));

        std::env::set_var(ENV_PHOTO_API_KEY, "from-env");
        assert_eq!(api.resolved_photo_api_key().as_deref(), Some("from-env"));

        std::env::set_var(ENV_PHOTO_API_KEY, "  ");
        assert_eq!(api.resolved_photo_api_key().as_deref(), Some("from-file"));

        std::env::remove_var(ENV_PHOTO_API_KEY);
    }

    #[test]
    fn blank_keys_are_treated_as_missing() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_STORE_KEY);
        let api = ApiConfig {
            store_key: Some("".into()),
            ..ApiConfig::default()
        };
        assert!(api.resolved_store_key().is_none());
    }
}
