//! Current-language state: detection, selection and persistence.

use crate::i18n::LanguageId;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

// ==================== Capabilities ====================

/// Key-value persistence, the equivalent of browser local storage.
pub trait Persistence: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Source of the user's preferred locales, most preferred first.
pub trait LocaleProvider: Send + Sync {
    fn preferred_locales(&self) -> Vec<String>;
}

/// Process-local persistence.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl Persistence for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

/// Persistence backed by a JSON object file.
///
/// Write failures are logged and otherwise ignored; losing a stored language
/// preference must not break a translation pass.
#[derive(Debug)]
pub struct FilePersistence {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FilePersistence {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let raw = serde_json::to_string_pretty(values).context("Failed to serialize store")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

impl Persistence for FilePersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&values) {
            warn!("Could not persist \"{}\": {:#}", key, e);
        }
    }
}

/// Locale preferences from the process environment.
///
/// Checks `LANGUAGE` (a colon-separated list), then `LC_ALL`, `LC_MESSAGES`
/// and `LANG`. `C` and `POSIX` are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvLocale;

impl LocaleProvider for EnvLocale {
    fn preferred_locales(&self) -> Vec<String> {
        let mut locales = Vec::new();

        if let Ok(language) = std::env::var("LANGUAGE") {
            locales.extend(
                language
                    .split(':')
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            );
        }

        for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    locales.push(value);
                }
            }
        }

        locales.retain(|l| l != "C" && l != "POSIX" && !l.starts_with("C."));
        locales
    }
}

/// A fixed preference list.
#[derive(Debug, Default, Clone)]
pub struct FixedLocales(pub Vec<String>);

impl LocaleProvider for FixedLocales {
    fn preferred_locales(&self) -> Vec<String> {
        self.0.clone()
    }
}

// ==================== LanguageState ====================

/// Settings the state machine reads from the configuration.
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub default_language: LanguageId,
    pub detect_language: bool,
    pub persist: bool,
    pub persist_key: String,
}

/// Tracks the default and current language.
pub struct LanguageState {
    settings: StateSettings,
    current: Option<LanguageId>,
    persistence: Option<Arc<dyn Persistence>>,
    locale: Option<Arc<dyn LocaleProvider>>,
}

impl LanguageState {
    pub fn new(
        settings: StateSettings,
        persistence: Option<Arc<dyn Persistence>>,
        locale: Option<Arc<dyn LocaleProvider>>,
    ) -> Self {
        Self {
            settings,
            current: None,
            persistence,
            locale,
        }
    }

    /// Work out the language to start in.
    ///
    /// Without detection enabled, or without a locale provider, this is the
    /// configured default. Otherwise a persisted choice wins over the first
    /// preferred locale.
    pub fn detect(&self) -> LanguageId {
        if !self.settings.detect_language {
            return self.settings.default_language.clone();
        }

        let Some(locale) = &self.locale else {
            debug!("No locale provider, skipping language detection");
            return self.settings.default_language.clone();
        };

        if let Some(stored) = self
            .persistence
            .as_ref()
            .and_then(|p| p.get(&self.settings.persist_key))
        {
            match LanguageId::parse(&stored) {
                Ok(lang) => return lang,
                Err(e) => warn!("Ignoring persisted language: {}", e),
            }
        }

        locale
            .preferred_locales()
            .first()
            .and_then(|preferred| LanguageId::from_locale(preferred))
            .unwrap_or_else(|| self.settings.default_language.clone())
    }

    pub fn default_language(&self) -> &LanguageId {
        &self.settings.default_language
    }

    pub fn set_default_language(&mut self, lang: LanguageId) {
        self.settings.default_language = lang;
    }

    /// The last successfully applied language, else the default.
    pub fn current_language(&self) -> &LanguageId {
        self.current
            .as_ref()
            .unwrap_or(&self.settings.default_language)
    }

    /// Record a successful translation pass, persisting it when enabled.
    pub fn record_applied(&mut self, lang: &LanguageId) {
        self.current = Some(lang.clone());

        if !self.settings.persist {
            return;
        }
        if let Some(persistence) = &self.persistence {
            persistence.set(&self.settings.persist_key, lang.as_str());
            debug!(
                "Persisted \"{}\" under \"{}\"",
                lang, self.settings.persist_key
            );
        }
    }
}

impl std::fmt::Debug for LanguageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageState")
            .field("settings", &self.settings)
            .field("current", &self.current)
            .field("persistence", &self.persistence.is_some())
            .field("locale", &self.locale.is_some())
            .finish()
    }
}
