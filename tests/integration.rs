// SPDX-License-Identifier: MPL-2.0
use mosaic_lens::app::config::{self, Config};
use mosaic_lens::app::session;
use mosaic_lens::domain::gallery::Category;
use mosaic_lens::i18n::fluent::I18n;
use tempfile::tempdir;

#[test]
fn language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    let mut english = Config::default();
    english.general.language = Some("en-US".to_string());
    config::save_to_path(&english, &path).expect("Failed to write initial config file");
    let loaded = config::load_from_path(&path).expect("Failed to load initial config");
    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "en-US");
    assert_eq!(i18n.tr("gallery-no-results"), "No photos found.");

    let mut portuguese = Config::default();
    portuguese.general.language = Some("pt-BR".to_string());
    config::save_to_path(&portuguese, &path).expect("Failed to write pt-BR config file");
    let loaded = config::load_from_path(&path).expect("Failed to load pt-BR config");
    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "pt-BR");
}

#[test]
fn cli_language_wins_over_config() {
    let mut config = Config::default();
    config.general.language = Some("pt-BR".to_string());
    let i18n = I18n::new(Some("en-US".to_string()), &config);
    assert_eq!(i18n.current_locale().to_string(), "en-US");
}

#[test]
fn every_category_label_is_translated() {
    for lang in ["en-US", "pt-BR"] {
        let i18n = I18n::new(Some(lang.to_string()), &Config::default());
        for category in Category::menu() {
            let key = category.i18n_key();
            let label = i18n.tr(key);
            assert!(!label.is_empty());
            assert!(!label.starts_with("MISSING"), "{lang} is missing {key}");
        }
    }
}

#[test]
fn config_directory_override_round_trips() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let mut custom = Config::default();
    custom.gallery.per_page = Some(12);
    custom.layout.columns = Some(3);
    config::save_with_override(&custom, Some(dir.path().to_path_buf()))
        .expect("Failed to save config");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    assert_eq!(loaded.gallery.page_size().value(), 12);
    assert_eq!(loaded.layout.column_count(), 3);
}

#[test]
fn session_survives_a_restart() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let first = session::load_or_create_with_override(Some(dir.path().to_path_buf()))
        .expect("session created");
    let second = session::load_or_create_with_override(Some(dir.path().to_path_buf()))
        .expect("session restored");
    assert_eq!(first, second);
    assert!(!first.as_str().is_empty());
}
