// SPDX-License-Identifier: MPL-2.0
//! Fluent bundles embedded at compile time.

use crate::app::config::Config;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use rust_embed::RustEmbed;
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

/// Locale used when nothing else matches and as the fallback for missing keys.
pub const DEFAULT_LOCALE: &str = "en-US";

pub struct I18n {
    bundles: HashMap<LanguageIdentifier, FluentBundle<FluentResource>>,
    pub available_locales: Vec<LanguageIdentifier>,
    current_locale: LanguageIdentifier,
    default_locale: LanguageIdentifier,
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(None, &Config::default())
    }
}

fn load_bundle(locale: &LanguageIdentifier, source: String) -> Option<FluentBundle<FluentResource>> {
    let resource = match FluentResource::try_new(source) {
        Ok(resource) => resource,
        Err((_, errors)) => {
            tracing::error!(%locale, ?errors, "failed to parse translation file");
            return None;
        }
    };
    let mut bundle = FluentBundle::new(vec![locale.clone()]);
    // Terminal output has no use for bidi isolation marks.
    bundle.set_use_isolating(false);
    if let Err(errors) = bundle.add_resource(resource) {
        tracing::error!(%locale, ?errors, "duplicate translation keys");
        return None;
    }
    Some(bundle)
}

impl I18n {
    /// Loads every embedded `.ftl` file and selects the locale from, in
    /// order, `cli_lang`, the config file and the OS, falling back to
    /// [`DEFAULT_LOCALE`].
    pub fn new(cli_lang: Option<String>, config: &Config) -> Self {
        let mut bundles = HashMap::new();
        let mut available_locales = Vec::new();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(locale) = filename
                .strip_suffix(".ftl")
                .and_then(|name| name.parse::<LanguageIdentifier>().ok())
            else {
                continue;
            };
            let Some(content) = Asset::get(filename) else {
                continue;
            };
            let source = String::from_utf8_lossy(content.data.as_ref()).into_owned();
            if let Some(bundle) = load_bundle(&locale, source) {
                bundles.insert(locale.clone(), bundle);
                available_locales.push(locale);
            }
        }
        available_locales.sort_by_key(ToString::to_string);

        let default_locale: LanguageIdentifier = DEFAULT_LOCALE.parse().unwrap_or_default();
        let os_locale = sys_locale::get_locale();
        let current_locale = resolve_locale(
            cli_lang.as_deref(),
            config.general.language.as_deref(),
            os_locale.as_deref(),
            &available_locales,
        )
        .unwrap_or_else(|| default_locale.clone());

        Self {
            bundles,
            available_locales,
            current_locale,
            default_locale,
        }
    }

    #[must_use]
    pub fn current_locale(&self) -> &LanguageIdentifier {
        &self.current_locale
    }

    /// Switches to `locale` if a bundle exists for it.
    pub fn set_locale(&mut self, locale: LanguageIdentifier) {
        if self.bundles.contains_key(&locale) {
            self.current_locale = locale;
        }
    }

    /// Translates `key`, falling back to the default locale and then to a
    /// visible `MISSING:` marker.
    pub fn tr(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Translates `key` with named arguments.
    pub fn tr_with_args(&self, key: &str, args: &[(&str, FluentValue<'_>)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, value.clone());
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs<'_>>) -> String {
        [&self.current_locale, &self.default_locale]
            .into_iter()
            .filter_map(|locale| self.bundles.get(locale))
            .find_map(|bundle| {
                let pattern = bundle.get_message(key)?.value()?;
                let mut errors = vec![];
                let value = bundle.format_pattern(pattern, args, &mut errors);
                errors.is_empty().then(|| value.into_owned())
            })
            .unwrap_or_else(|| format!("MISSING: {key}"))
    }
}

fn matching(candidate: Option<&str>, available: &[LanguageIdentifier]) -> Option<LanguageIdentifier> {
    let lang = candidate?.parse::<LanguageIdentifier>().ok()?;
    if available.contains(&lang) {
        return Some(lang);
    }
    // "pt" or "pt-PT" still selects "pt-BR" when it is the only Portuguese bundle.
    available
        .iter()
        .find(|locale| locale.language == lang.language)
        .cloned()
}

fn resolve_locale(
    cli_lang: Option<&str>,
    config_lang: Option<&str>,
    os_lang: Option<&str>,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    [cli_lang, config_lang, os_lang]
        .into_iter()
        .find_map(|candidate| matching(candidate, available))
}
