//! The translator façade.
//!
//! Wires a [`Config`] and a [`Runtime`] into the store, loader, apply engine
//! and language state. Every method signals data problems through
//! diagnostics instead of returning errors, so a host can call it from UI code
//! without handling failures.

use crate::apply::{ApplyEngine, ApplyReport};
use crate::config::{Config, Selector};
use crate::diagnostics::Diagnostics;
use crate::dom::{ElementLocator, ElementRef};
use crate::error::ErrorCode;
use crate::global::{Shortcut, ShortcutRegistry};
use crate::i18n::{resolve_with_fallback, LanguageId, ResourceStore, SharedStore};
use crate::loader::{LoadedResource, ResourceLoader, Sources};
use crate::runtime::Runtime;
use crate::state::{LanguageState, StateSettings};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// State shared between the translator and the shortcuts it hands out.
#[derive(Clone)]
struct Shared {
    store: SharedStore,
    state: Arc<RwLock<LanguageState>>,
    diagnostics: Diagnostics,
}

impl Shared {
    fn default_language(&self) -> LanguageId {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .default_language()
            .clone()
    }

    fn target_language(&self, lang: Option<&str>) -> Option<LanguageId> {
        match lang {
            None => Some(self.default_language()),
            Some(code) => match LanguageId::parse(code) {
                Ok(lang) => Some(lang),
                Err(err) => {
                    self.diagnostics.report_error(&err);
                    None
                }
            },
        }
    }

    fn translate(&self, key: &str, lang: Option<&str>) -> Option<String> {
        if key.is_empty() {
            self.diagnostics
                .report(ErrorCode::EmptyParamKey, "translation key must not be empty");
            return None;
        }
        if key.chars().any(char::is_whitespace) {
            self.diagnostics.report(
                ErrorCode::InvalidParamKey,
                &format!("translation key \"{}\" contains whitespace", key),
            );
            return None;
        }

        let target = self.target_language(lang)?;
        let default_lang = self.default_language();

        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        if !store.has(target.as_str()) {
            self.diagnostics.report(
                ErrorCode::NoLanguageRegistered,
                &format!("no resource registered for \"{}\"", target),
            );
            return None;
        }

        let resolution =
            resolve_with_fallback(&store, key, target.as_str(), default_lang.as_str());
        if !resolution.is_found() {
            self.diagnostics.report(
                ErrorCode::TranslationNotFound,
                &format!("no translation for \"{}\" in \"{}\"", key, target),
            );
        }

        resolution.value().map(str::to_string)
    }
}

pub struct Translator {
    config: Config,
    shared: Shared,
    loader: ResourceLoader,
    engine: ApplyEngine,
    locator: Option<Arc<dyn ElementLocator>>,
}

impl Translator {
    /// Build a translator, detect the starting language and, when
    /// `register_globally` names a shortcut, register it process-wide.
    pub fn new(config: Config, runtime: Runtime) -> Self {
        let diagnostics = Diagnostics::new(config.debug, runtime.sink.clone());

        let default_language = match LanguageId::parse(&config.default_language) {
            Ok(lang) => lang,
            Err(err) => {
                diagnostics.report_error(&err);
                LanguageId::default()
            }
        };

        let settings = StateSettings {
            default_language,
            detect_language: config.detect_language,
            persist: config.persist,
            persist_key: config.persist_key.clone(),
        };
        let mut state = LanguageState::new(settings, runtime.persistence, runtime.locale);
        let detected = state.detect();
        debug!("Starting in \"{}\"", detected);
        state.set_default_language(detected);

        let store = ResourceStore::shared();
        let loader = ResourceLoader::new(
            runtime.fetcher,
            store.clone(),
            diagnostics.clone(),
            config.files_location.clone(),
        );

        let translator = Self {
            shared: Shared {
                store,
                state: Arc::new(RwLock::new(state)),
                diagnostics: diagnostics.clone(),
            },
            loader,
            engine: ApplyEngine::new(diagnostics),
            locator: runtime.locator,
            config,
        };

        if let Some(name) = translator
            .config
            .register_globally
            .as_deref()
            .filter(|name| !name.is_empty())
        {
            ShortcutRegistry::global().register(name, translator.shortcut());
            debug!("Registered translate shortcut as \"{}\"", name);
        }

        translator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register `resource` for `lang`, replacing any previous resource.
    pub fn add(&self, lang: &str, resource: Value) -> &Self {
        let result = self
            .shared
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(lang, resource)
            .map(|_| ());

        match result {
            Ok(()) => debug!("Added resource for \"{}\"", lang),
            Err(err) => self.shared.diagnostics.report_error(&err),
        }
        self
    }

    pub fn remove(&self, lang: &str) -> &Self {
        let result = self
            .shared
            .store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(lang)
            .map(|_| ());

        if let Err(err) = result {
            self.shared.diagnostics.report_error(&err);
        }
        self
    }

    pub fn has(&self, lang: &str) -> bool {
        self.shared
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .has(lang)
    }

    /// Registered languages, sorted.
    pub fn languages(&self) -> Vec<LanguageId> {
        self.shared
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .languages()
    }

    /// Look up a single key. `None` for `lang` means the default language.
    ///
    /// A key the target language lacks falls back to the default language;
    /// the value is returned and `TranslationNotFound` is still reported.
    pub fn translate_for_key(&self, key: &str, lang: Option<&str>) -> Option<String> {
        self.shared.translate(key, lang)
    }

    /// Translate every located element into `lang` (the default language when
    /// `None`). Returns the pass report, or `None` when nothing was applied.
    pub fn translate_page_to(&self, lang: Option<&str>) -> Option<ApplyReport> {
        let elements: Vec<ElementRef> = match &self.config.selector {
            Selector::Elements(elements) => elements.clone(),
            Selector::Query(query) => match &self.locator {
                Some(locator) => locator.locate(query),
                None => {
                    self.shared.diagnostics.report(
                        ErrorCode::InvalidEnvironment,
                        "no document available to translate",
                    );
                    return None;
                }
            },
        };

        let target = self.shared.target_language(lang)?;
        let default_lang = self.shared.default_language();

        let result = {
            let store = self
                .shared
                .store
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            self.engine.apply(&store, &target, &default_lang, &elements)
        };

        match result {
            Ok(report) => {
                self.shared
                    .state
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .record_applied(&target);
                if let Some(locator) = &self.locator {
                    locator.set_document_language(target.as_str());
                }
                info!(
                    "✓ Translated page to \"{}\" ({} values written)",
                    target, report.written
                );
                Some(report)
            }
            Err(err) => {
                self.shared.diagnostics.report_error(&err);
                None
            }
        }
    }

    /// Load `sources` concurrently. With `persist` set, successes are added
    /// to the store as they settle.
    pub async fn fetch(&self, sources: impl Into<Sources>, persist: bool) -> Vec<LoadedResource> {
        self.loader.load(sources, persist).await
    }

    /// Change the default language and re-translate the page into it.
    ///
    /// The language must already be registered. In a headless runtime only
    /// the default changes.
    pub fn set_default_language(&self, lang: &str) {
        let lang = match LanguageId::parse(lang) {
            Ok(lang) => lang,
            Err(err) => {
                self.shared.diagnostics.report_error(&err);
                return;
            }
        };

        if !self.has(lang.as_str()) {
            self.shared.diagnostics.report(
                ErrorCode::NoLanguageRegistered,
                &format!("cannot make \"{}\" the default: no resource registered", lang),
            );
            return;
        }

        self.shared
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_default_language(lang);

        if self.can_apply() {
            self.translate_page_to(None);
        }
    }

    pub fn default_language(&self) -> LanguageId {
        self.shared.default_language()
    }

    /// The last applied language, else the default.
    pub fn current_language(&self) -> LanguageId {
        self.shared
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current_language()
            .clone()
    }

    /// A `translate_for_key` bound to this translator's state.
    pub fn shortcut(&self) -> Shortcut {
        let shared = self.shared.clone();
        Arc::new(move |key: &str, lang: Option<&str>| shared.translate(key, lang))
    }

    fn can_apply(&self) -> bool {
        self.locator.is_some() || matches!(self.config.selector, Selector::Elements(_))
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("config", &self.config)
            .field("languages", &self.languages())
            .field("default_language", &self.default_language())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::dom::{MemoryDocument, MemoryElement, TranslatableElement};
    use crate::loader::StaticFetcher;
    use crate::state::{FixedLocales, MemoryPersistence, Persistence};
    use serde_json::json;
    use serial_test::serial;

    // ==================== Helper Functions ====================

    fn config() -> Config {
        Config {
            debug: true,
            detect_language: false,
            register_globally: None,
            ..Config::default()
        }
    }

    fn runtime(sink: &Arc<RecordingSink>, document: &Arc<MemoryDocument>) -> Runtime {
        Runtime::new(Arc::new(StaticFetcher::new()))
            .with_locator(document.clone())
            .with_sink(sink.clone())
    }

    fn setup() -> (Translator, Arc<MemoryDocument>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let translator = Translator::new(config(), runtime(&sink, &document));
        (translator, document, sink)
    }

    fn english() -> Value {
        json!({
            "title": "Hello",
            "nav": { "home": "Home", "about": "About" },
            "meta": { "description": "A description" }
        })
    }

    fn german() -> Value {
        json!({
            "title": "Hallo",
            "nav": { "home": "Startseite" }
        })
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_uses_configured_default() {
        let (translator, _, sink) = setup();
        assert_eq!(translator.default_language().as_str(), "en");
        assert_eq!(translator.current_language().as_str(), "en");
        assert!(translator.languages().is_empty());
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_new_detects_language_from_locale() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let runtime = runtime(&sink, &document)
            .with_locale(Arc::new(FixedLocales(vec!["de-DE".to_string()])));

        let translator = Translator::new(
            Config {
                detect_language: true,
                ..config()
            },
            runtime,
        );

        assert_eq!(translator.default_language().as_str(), "de");
    }

    #[test]
    fn test_new_with_invalid_default_reports_and_uses_english() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let translator = Translator::new(
            Config {
                default_language: "not valid".to_string(),
                ..config()
            },
            runtime(&sink, &document),
        );

        assert_eq!(translator.default_language().as_str(), "en");
        assert_eq!(sink.codes(), vec![ErrorCode::InvalidLanguage]);
    }

    #[test]
    #[serial]
    fn test_new_registers_shortcut_globally() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let translator = Translator::new(
            Config {
                register_globally: Some("__test_t".to_string()),
                ..config()
            },
            runtime(&sink, &document),
        );
        translator.add("en", english());

        let shortcut = ShortcutRegistry::global()
            .get("__test_t")
            .expect("Shortcut should be registered");
        assert_eq!(shortcut("nav.home", None).as_deref(), Some("Home"));

        ShortcutRegistry::global().unregister("__test_t");
    }

    #[test]
    #[serial]
    fn test_new_without_name_registers_nothing() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let _translator = Translator::new(
            Config {
                register_globally: Some(String::new()),
                ..config()
            },
            runtime(&sink, &document),
        );

        assert!(!ShortcutRegistry::global().contains(""));
    }

    // ==================== add / remove Tests ====================

    #[test]
    fn test_add_is_chainable() {
        let (translator, _, sink) = setup();
        translator.add("en", english()).add("de", german()).remove("en");

        assert!(!translator.has("en"));
        assert!(translator.has("de"));
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_add_reports_bad_input() {
        let (translator, _, sink) = setup();
        translator
            .add("", english())
            .add("d e", english())
            .add("de", json!({}))
            .add("de", json!("nope"));

        assert_eq!(
            sink.codes(),
            vec![
                ErrorCode::EmptyLanguage,
                ErrorCode::InvalidLanguage,
                ErrorCode::EmptyResource,
                ErrorCode::InvalidResource,
            ]
        );
        assert!(translator.languages().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (translator, _, sink) = setup();
        translator.remove("fr");
        assert!(sink.reports().is_empty());
    }

    // ==================== translate_for_key Tests ====================

    #[test]
    fn test_translate_for_key_uses_default_language() {
        let (translator, _, _) = setup();
        translator.add("en", english()).add("de", german());

        assert_eq!(
            translator.translate_for_key("nav.about", None).as_deref(),
            Some("About")
        );
        assert_eq!(
            translator.translate_for_key("title", Some("de")).as_deref(),
            Some("Hallo")
        );
    }

    #[test]
    fn test_translate_for_key_rejects_bad_keys() {
        let (translator, _, sink) = setup();
        translator.add("en", english());

        assert!(translator.translate_for_key("", None).is_none());
        assert!(translator.translate_for_key("nav home", None).is_none());
        assert_eq!(
            sink.codes(),
            vec![ErrorCode::EmptyParamKey, ErrorCode::InvalidParamKey]
        );
    }

    #[test]
    fn test_translate_for_key_rejects_bad_languages() {
        let (translator, _, sink) = setup();
        translator.add("en", english());

        assert!(translator.translate_for_key("title", Some("")).is_none());
        assert!(translator.translate_for_key("title", Some("../x")).is_none());
        assert!(translator.translate_for_key("title", Some("fr")).is_none());
        assert_eq!(
            sink.codes(),
            vec![
                ErrorCode::EmptyLanguage,
                ErrorCode::InvalidLanguage,
                ErrorCode::NoLanguageRegistered,
            ]
        );
    }

    #[test]
    fn test_translate_for_key_falls_back_and_reports() {
        let (translator, _, sink) = setup();
        translator.add("en", english()).add("de", german());

        assert_eq!(
            translator.translate_for_key("nav.about", Some("de")).as_deref(),
            Some("About")
        );
        assert_eq!(sink.codes(), vec![ErrorCode::TranslationNotFound]);
    }

    #[test]
    fn test_translate_for_key_missing_everywhere() {
        let (translator, _, sink) = setup();
        translator.add("en", english());

        assert!(translator.translate_for_key("nav.contact", None).is_none());
        assert_eq!(sink.count(ErrorCode::TranslationNotFound), 1);
    }

    #[test]
    fn test_reports_dropped_without_debug() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let translator = Translator::new(
            Config {
                debug: false,
                ..config()
            },
            runtime(&sink, &document),
        );

        translator.add("", english());
        assert!(translator.translate_for_key("", None).is_none());
        assert!(sink.reports().is_empty());
    }

    // ==================== translate_page_to Tests ====================

    #[test]
    fn test_translate_page_to_writes_content_and_attributes() {
        let (translator, document, sink) = setup();
        translator.add("en", english()).add("de", german());

        let heading = document.append(
            MemoryElement::new("h1")
                .with_attribute("data-i18n", "title")
                .with_content("Title"),
        );
        let meta = document.append(
            MemoryElement::new("meta")
                .with_attribute("data-i18n", "meta.description")
                .with_attribute("data-i18n-attr", "content"),
        );

        let report = translator.translate_page_to(Some("de")).expect("Should apply");

        assert_eq!(heading.content(), "Hallo");
        assert_eq!(meta.attribute("content").as_deref(), Some("A description"));
        assert_eq!(report.elements, 2);
        assert_eq!(report.written, 2);
        assert_eq!(report.missing, 1);
        assert_eq!(sink.codes(), vec![ErrorCode::TranslationNotFound]);
        assert_eq!(translator.current_language().as_str(), "de");
        assert_eq!(document.language().as_deref(), Some("de"));
    }

    #[test]
    fn test_translate_page_to_unregistered_language() {
        let (translator, document, sink) = setup();
        translator.add("en", english());
        let heading = document.append(
            MemoryElement::new("h1")
                .with_attribute("data-i18n", "title")
                .with_content("Title"),
        );

        assert!(translator.translate_page_to(Some("fr")).is_none());

        assert_eq!(heading.content(), "Title");
        assert_eq!(sink.codes(), vec![ErrorCode::NoLanguageRegistered]);
        assert_eq!(translator.current_language().as_str(), "en");
        assert!(document.language().is_none());
    }

    #[test]
    fn test_translate_page_to_headless_reports_invalid_environment() {
        let sink = Arc::new(RecordingSink::new());
        let translator = Translator::new(
            config(),
            Runtime::new(Arc::new(StaticFetcher::new())).with_sink(sink.clone()),
        );
        translator.add("en", english());

        assert!(translator.translate_page_to(None).is_none());
        assert_eq!(sink.codes(), vec![ErrorCode::InvalidEnvironment]);
    }

    #[test]
    fn test_translate_page_to_with_resolved_elements() {
        let sink = Arc::new(RecordingSink::new());
        let element = MemoryElement::new("p").with_attribute("data-i18n", "nav.home");
        let translator = Translator::new(
            Config {
                selector: Selector::Elements(vec![Arc::new(element.clone()) as ElementRef]),
                ..config()
            },
            Runtime::new(Arc::new(StaticFetcher::new())).with_sink(sink.clone()),
        );
        translator.add("en", english());

        let report = translator.translate_page_to(None).expect("Should apply");

        assert_eq!(report.written, 1);
        assert_eq!(element.content(), "Home");
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_translate_page_to_custom_selector() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let translator = Translator::new(
            Config {
                selector: Selector::Query("h1".to_string()),
                ..config()
            },
            runtime(&sink, &document),
        );
        translator.add("en", english());

        let heading = document.append(MemoryElement::new("h1").with_attribute("data-i18n", "title"));
        let paragraph =
            document.append(MemoryElement::new("p").with_attribute("data-i18n", "nav.home"));

        translator.translate_page_to(None);

        assert_eq!(heading.content(), "Hello");
        assert_eq!(paragraph.content(), "");
    }

    #[test]
    fn test_translate_page_to_persists_when_enabled() {
        let sink = Arc::new(RecordingSink::new());
        let document = Arc::new(MemoryDocument::new());
        let persistence = Arc::new(MemoryPersistence::new());
        let translator = Translator::new(
            Config {
                persist: true,
                persist_key: "custom_language".to_string(),
                ..config()
            },
            runtime(&sink, &document).with_persistence(persistence.clone()),
        );
        translator.add("en", english()).add("de", german());

        translator.translate_page_to(Some("de"));

        assert_eq!(persistence.get("custom_language").as_deref(), Some("de"));
    }

    // ==================== set_default_language Tests ====================

    #[test]
    fn test_set_default_language_reapplies() {
        let (translator, document, _) = setup();
        translator.add("en", english()).add("de", german());
        let heading = document.append(MemoryElement::new("h1").with_attribute("data-i18n", "title"));

        translator.set_default_language("de");

        assert_eq!(translator.default_language().as_str(), "de");
        assert_eq!(translator.current_language().as_str(), "de");
        assert_eq!(heading.content(), "Hallo");
        assert_eq!(
            translator.translate_for_key("title", None).as_deref(),
            Some("Hallo")
        );
    }

    #[test]
    fn test_set_default_language_requires_registered_language() {
        let (translator, _, sink) = setup();
        translator.add("en", english());

        translator.set_default_language("fr");
        translator.set_default_language("");

        assert_eq!(translator.default_language().as_str(), "en");
        assert_eq!(
            sink.codes(),
            vec![ErrorCode::NoLanguageRegistered, ErrorCode::EmptyLanguage]
        );
    }

    #[test]
    fn test_set_default_language_headless_only_updates_default() {
        let sink = Arc::new(RecordingSink::new());
        let translator = Translator::new(
            config(),
            Runtime::new(Arc::new(StaticFetcher::new())).with_sink(sink.clone()),
        );
        translator.add("en", english()).add("de", german());

        translator.set_default_language("de");

        assert_eq!(translator.default_language().as_str(), "de");
        assert!(sink.reports().is_empty());
    }

    // ==================== fetch Tests ====================

    #[tokio::test]
    async fn test_fetch_persists_into_store() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = StaticFetcher::new()
            .with("/i18n/de.json", german())
            .with("/i18n/en.json", english());
        let translator = Translator::new(
            config(),
            Runtime::new(Arc::new(fetcher)).with_sink(sink.clone()),
        );

        let loaded = translator.fetch(["de", "en"], true).await;

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].language.as_str(), "de");
        assert!(translator.has("de"));
        assert!(translator.has("en"));
        assert!(sink.reports().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_persist_leaves_store_alone() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = StaticFetcher::new().with("/i18n/de.json", german());
        let translator = Translator::new(
            config(),
            Runtime::new(Arc::new(fetcher)).with_sink(sink.clone()),
        );

        let loaded = translator.fetch("de", false).await;

        assert_eq!(loaded.len(), 1);
        assert!(!translator.has("de"));
    }

    // ==================== shortcut Tests ====================

    #[test]
    fn test_shortcut_tracks_default_language() {
        let (translator, _, _) = setup();
        translator.add("en", english()).add("de", german());
        let shortcut = translator.shortcut();

        assert_eq!(shortcut("title", None).as_deref(), Some("Hello"));
        translator.set_default_language("de");
        assert_eq!(shortcut("title", None).as_deref(), Some("Hallo"));
        assert_eq!(shortcut("title", Some("en")).as_deref(), Some("Hello"));
    }
}
