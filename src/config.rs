use crate::dom::ElementRef;
use anyhow::Result;

/// How translatable elements are found.
#[derive(Clone)]
pub enum Selector {
    /// Query passed to the runtime's element locator.
    Query(String),
    /// Elements the host already resolved.
    Elements(Vec<ElementRef>),
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Query(query) => f.debug_tuple("Query").field(query).finish(),
            Selector::Elements(elements) => {
                write!(f, "Elements({} elements)", elements.len())
            }
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Selector::Query("[data-i18n]".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Languages
    pub default_language: String,
    pub detect_language: bool,

    // Elements
    /// `Selector::Query` takes a selector list for the runtime's locator
    /// (`*`, `tag`, `[attr]`, `[attr="value"]`, `tag[attr]`, comma-separated).
    /// `Selector::Elements` takes handles the host already resolved.
    pub selector: Selector,

    // Diagnostics
    pub debug: bool,

    // Global shortcut name, `None` to skip registration
    pub register_globally: Option<String>,

    // Persistence
    pub persist: bool,
    pub persist_key: String,

    /// Base path for bare language ids: `"de"` loads
    /// `{files_location}/de.json`. A trailing `/` is ignored. Sources that
    /// already carry an extension are used as given.
    pub files_location: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: "en".to_string(),
            detect_language: true,
            selector: Selector::default(),
            debug: false,
            register_globally: Some("__".to_string()),
            persist: false,
            persist_key: "preferred_language".to_string(),
            files_location: "/i18n".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            // Languages
            default_language: std::env::var("TRANSLATOR_DEFAULT_LANGUAGE")
                .unwrap_or(defaults.default_language),
            detect_language: env_bool("TRANSLATOR_DETECT_LANGUAGE", defaults.detect_language)?,

            // Elements
            selector: std::env::var("TRANSLATOR_SELECTOR")
                .map(Selector::Query)
                .unwrap_or(defaults.selector),

            // Diagnostics
            debug: env_bool("TRANSLATOR_DEBUG", defaults.debug)?,

            // Global shortcut - empty or "false" disables it
            register_globally: match std::env::var("TRANSLATOR_REGISTER_GLOBALLY") {
                Ok(name) if name.is_empty() || name.eq_ignore_ascii_case("false") => None,
                Ok(name) => Some(name),
                Err(_) => defaults.register_globally,
            },

            // Persistence
            persist: env_bool("TRANSLATOR_PERSIST", defaults.persist)?,
            persist_key: std::env::var("TRANSLATOR_PERSIST_KEY")
                .unwrap_or(defaults.persist_key),

            files_location: std::env::var("TRANSLATOR_FILES_LOCATION")
                .unwrap_or(defaults.files_location),
        })
    }
}

fn env_bool(var: &str, default: bool) -> Result<bool> {
    match std::env::var(var) {
        Ok(value) => parse_bool(&value)
            .ok_or_else(|| anyhow::anyhow!("{} must be a boolean, got \"{}\"", var, value)),
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
