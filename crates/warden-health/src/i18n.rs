//! # Design
//!
//! - Diagnostic findings carry a message key and parameters; text is produced here.
//! - Bundles ship with the crate (`i18n/<locale>.json`) and are parsed once per locale.
//! - Missing keys fall back to the default locale, then to the key itself.
//! - Bundle parse failures degrade to empty bundles and log once at load time.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::error;
use warden_config::LocaleCode;

/// Catalog key of the separator placed between navigation path segments.
pub const NAVIGATION_SEPARATOR_KEY: &str = "Display_SettingNavigationSeparator";

/// Locale-parameterised message text.
pub trait MessageCatalog: Send + Sync {
    /// Render `key` for `locale`, substituting `{0}`, `{1}`, … with `parameters`.
    fn render(&self, locale: LocaleCode, key: &str, parameters: &[String]) -> String;
}

/// Catalog backed by the JSON bundles compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledCatalog;

impl MessageCatalog for BundledCatalog {
    fn render(&self, locale: LocaleCode, key: &str, parameters: &[String]) -> String {
        substitute(&localize(locale, key), parameters)
    }
}

/// Raw message text for `key`, falling back to the default locale and then to the key.
#[must_use]
pub fn localize(locale: LocaleCode, key: &str) -> String {
    translations_for(locale)
        .lookup(key)
        .or_else(|| translations_for(LocaleCode::default()).lookup(key))
        .map_or_else(|| key.to_string(), ToString::to_string)
}

/// Separator used when rendering setting locations.
#[must_use]
pub fn navigation_separator(locale: LocaleCode) -> String {
    localize(locale, NAVIGATION_SEPARATOR_KEY)
}

#[derive(Debug, Default)]
struct TranslationBundle {
    messages: HashMap<String, String>,
}

impl TranslationBundle {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct TranslationFile {
    #[serde(default)]
    messages: HashMap<String, String>,
}

fn translations_for(locale: LocaleCode) -> &'static TranslationBundle {
    static EN_TRANSLATIONS: OnceLock<TranslationBundle> = OnceLock::new();
    static DE_TRANSLATIONS: OnceLock<TranslationBundle> = OnceLock::new();
    match locale {
        LocaleCode::En => EN_TRANSLATIONS.get_or_init(|| load_translations(LocaleCode::En)),
        LocaleCode::De => DE_TRANSLATIONS.get_or_init(|| load_translations(LocaleCode::De)),
    }
}

fn load_translations(locale: LocaleCode) -> TranslationBundle {
    let raw = match locale {
        LocaleCode::En => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/i18n/en.json")),
        LocaleCode::De => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/i18n/de.json")),
    };
    match serde_json::from_str::<TranslationFile>(raw) {
        Ok(file) => TranslationBundle {
            messages: file.messages,
        },
        Err(err) => {
            error!(
                error = %err,
                locale = locale.as_str(),
                "failed to parse health i18n bundle"
            );
            TranslationBundle::default()
        }
    }
}

/// Single pass over the template so parameter text is never re-expanded.
fn substitute(template: &str, parameters: &[String]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let replacement = tail.find('}').and_then(|close| {
            let index = tail[..close].parse::<usize>().ok()?;
            parameters.get(index).map(|param| (param, close))
        });
        if let Some((param, close)) = replacement {
            rendered.push_str(param);
            rest = &tail[close + 1..];
        } else {
            rendered.push('{');
            rest = tail;
        }
    }
    rendered.push_str(rest);
    rendered
}
