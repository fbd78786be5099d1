// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! # Path Resolution Order
//!
//! Both the data and the config directory resolve in the same order:
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`MOSAIC_LENS_DATA_DIR`, `MOSAIC_LENS_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs`, with the application name appended
//!
//! The data directory holds the session identifier and exported diagnostics;
//! preferences live in the config directory.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "MosaicLens";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "MOSAIC_LENS_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "MOSAIC_LENS_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--data-dir` / `--config-dir` arguments.
///
/// Call once at startup, before any path is resolved. Later calls are
/// ignored.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    if CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_err() {
        tracing::debug!("CLI data dir override already initialized");
    }
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        tracing::debug!("CLI config dir override already initialized");
    }
}

fn resolve_dir(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_key: &str,
    platform: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }
    if let Ok(env_path) = std::env::var(env_key) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    platform().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the application data directory path.
///
/// - Linux: `~/.local/share/MosaicLens/`
/// - macOS: `~/Library/Application Support/MosaicLens/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\MosaicLens\`
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

/// Returns the application data directory path with an optional override.
pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve_dir(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir)
}

/// Returns the application config directory path.
///
/// - Linux: `~/.config/MosaicLens/`
/// - macOS: `~/Library/Application Support/MosaicLens/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\MosaicLens\`
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory path with an optional override.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve_dir(override_path, &CLI_CONFIG_DIR, ENV_CONFIG_DIR, dirs::config_dir)
}

/// Returns the path of a file inside the application data directory.
pub fn data_file_with_override(name: &str, override_path: Option<PathBuf>) -> Option<PathBuf> {
    get_app_data_dir_with_override(override_path).map(|mut path| {
        path.push(name);
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel tests from interfering with each other's env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn app_data_dir_contains_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_DATA_DIR);

        if let Some(path) = get_app_data_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn app_config_dir_contains_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_CONFIG_DIR);

        if let Some(path) = get_app_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }
    }

    #[test]
    fn override_path_takes_precedence() {
        let override_path = PathBuf::from("/custom/path");
        assert_eq!(
            get_app_data_dir_with_override(Some(override_path.clone())),
            Some(override_path.clone())
        );
        assert_eq!(
            get_app_config_dir_with_override(Some(override_path.clone())),
            Some(override_path)
        );
    }

    #[test]
    fn env_var_overrides_default_data_dir() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "/test/data/dir");

        assert_eq!(get_app_data_dir(), Some(PathBuf::from("/test/data/dir")));

        std::env::remove_var(ENV_DATA_DIR);
    }

    #[test]
    fn empty_env_var_uses_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(path) = get_app_config_dir() {
            assert!(path.to_string_lossy().contains(APP_NAME));
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn override_path_takes_precedence_over_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "/env/path");

        let override_path = PathBuf::from("/override/path");
        assert_eq!(
            get_app_data_dir_with_override(Some(override_path.clone())),
            Some(override_path)
        );

        std::env::remove_var(ENV_DATA_DIR);
    }

    #[test]
    fn data_file_is_joined_to_data_dir() {
        let base = PathBuf::from("/custom/data");
        assert_eq!(
            data_file_with_override("session_id", Some(base.clone())),
            Some(base.join("session_id"))
        );
    }
}
