//! Internationalization (i18n) module.
//!
//! Translations are embedded at compile time and looked up by dotted key.

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono_tz::Tz;
use serde_json::Value;

/// Language used when the user has none stored or it is unsupported.
pub const DEFAULT_LANG: &str = "en";

/// A language the bot speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub label: &'static str,
    pub timezone: Tz,
}

/// Supported languages, in menu order.
pub const LANGUAGES: &[Language] = &[
    Language { code: "pt", label: "🇧🇷 Português", timezone: chrono_tz::America::Sao_Paulo },
    Language { code: "en", label: "🇺🇸 English", timezone: chrono_tz::America::New_York },
    Language { code: "es", label: "🇪🇸 Español", timezone: chrono_tz::Europe::Madrid },
];

/// Global translation store: LangCode -> Key -> Text
static TRANSLATIONS: OnceLock<HashMap<&'static str, Value>> = OnceLock::new();

fn store() -> &'static HashMap<&'static str, Value> {
    TRANSLATIONS.get_or_init(|| {
        let sources = [
            ("en", include_str!("en.json")),
            ("pt", include_str!("pt.json")),
            ("es", include_str!("es.json")),
        ];

        let mut map = HashMap::new();
        for (lang, raw) in sources {
            match serde_json::from_str(raw) {
                Ok(val) => {
                    map.insert(lang, val);
                }
                Err(e) => tracing::error!("Invalid {} translations: {}", lang, e),
            }
        }
        map
    })
}

/// Load the catalogs eagerly so a broken file shows up at startup.
pub fn init() {
    let loaded = store().len();
    tracing::info!("Loaded {} translation catalogs", loaded);
}

/// Look up a supported language by code.
pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Normalize a stored language code to a supported one.
pub fn normalize(code: &str) -> &'static str {
    language(code).map(|l| l.code).unwrap_or(DEFAULT_LANG)
}

/// Timezone used for local times shown to speakers of `code`.
pub fn timezone(code: &str) -> Tz {
    language(code)
        .or_else(|| language(DEFAULT_LANG))
        .map(|l| l.timezone)
        .unwrap_or(chrono_tz::America::New_York)
}

/// Get text for a key in a specific language.
/// Supports nested keys via dot notation, e.g., "help.text".
pub fn get_text(lang: &str, key: &str) -> String {
    let store = store();

    if let Some(text) = store.get(lang).and_then(|val| resolve_key(val, key)) {
        return text;
    }

    if lang != DEFAULT_LANG
        && let Some(text) = store.get(DEFAULT_LANG).and_then(|val| resolve_key(val, key))
    {
        return text;
    }

    key.to_string()
}

/// Get text and substitute `{name}` placeholders.
pub fn get_text_with(lang: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill(&get_text(lang, key), args)
}

/// Substitute `{name}` placeholders in a template.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(|s| s.to_string())
}
