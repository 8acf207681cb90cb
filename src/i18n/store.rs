//! In-memory cache of language resources.
//!
//! The store owns one [`ResourceTree`] per [`LanguageId`]. Adding a language
//! that is already present replaces its whole tree; nothing is ever merged or
//! evicted implicitly.

use crate::error::{ErrorCode, Result, TranslatorError};
use crate::i18n::LanguageId;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Store handle shared between the loader, the apply engine and shortcuts.
pub type SharedStore = Arc<RwLock<ResourceStore>>;

/// A parsed, non-empty language resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTree(Map<String, Value>);

impl ResourceTree {
    /// Top-level entries of the tree.
    pub fn entries(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Look up a direct child.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for ResourceTree {
    type Error = TranslatorError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) if map.is_empty() => Err(TranslatorError::new(
                ErrorCode::EmptyResource,
                "resource must contain at least one entry",
            )),
            Value::Object(map) => Ok(ResourceTree(map)),
            other => Err(TranslatorError::new(
                ErrorCode::InvalidResource,
                format!("resource must be a JSON object, got {}", json_kind(&other)),
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Mapping from language id to resource tree.
#[derive(Debug, Default)]
pub struct ResourceStore {
    languages: HashMap<LanguageId, ResourceTree>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh store for sharing.
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Validate and register a resource, replacing any existing entry.
    ///
    /// Returns the store so registrations can be chained:
    ///
    /// ```
    /// # use page_translator::ResourceStore;
    /// # use serde_json::json;
    /// let mut store = ResourceStore::new();
    /// store
    ///     .add("de", json!({ "title": "Titel" }))?
    ///     .add("en", json!({ "title": "Title" }))?;
    /// assert_eq!(store.len(), 2);
    /// # Ok::<(), page_translator::TranslatorError>(())
    /// ```
    pub fn add(&mut self, lang: &str, resource: Value) -> Result<&mut Self> {
        let lang = LanguageId::parse(lang)?;
        let tree = ResourceTree::try_from(resource)?;
        self.insert(lang, tree);
        Ok(self)
    }

    /// Register an already-validated tree.
    pub fn insert(&mut self, lang: LanguageId, tree: ResourceTree) {
        self.languages.insert(lang, tree);
    }

    /// Remove a language. Removing an absent language is a no-op.
    pub fn remove(&mut self, lang: &str) -> Result<&mut Self> {
        let lang = LanguageId::parse(lang)?;
        self.languages.remove(&lang);
        Ok(self)
    }

    /// Check whether a language has a registered resource.
    ///
    /// # Arguments
    /// * `lang` - Language id, compared case-sensitively
    ///
    /// # Returns
    /// `true` if a resource tree is stored under `lang`
    pub fn has(&self, lang: &str) -> bool {
        self.languages.contains_key(lang)
    }

    /// Get the resource tree of a language.
    ///
    /// # Arguments
    /// * `lang` - Language id, compared case-sensitively
    ///
    /// # Returns
    /// * `Some(&ResourceTree)` if the language is registered
    /// * `None` if it is not
    pub fn get(&self, lang: &str) -> Option<&ResourceTree> {
        self.languages.get(lang)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Registered language ids, sorted.
    pub fn languages(&self) -> Vec<LanguageId> {
        let mut ids: Vec<LanguageId> = self.languages.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== add Tests ====================

    #[test]
    fn test_add_single_language() {
        let mut store = ResourceStore::new();
        assert!(store.is_empty());

        store.add("de", json!({ "title": "German title" })).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("de").unwrap().clone().into_value(),
            json!({ "title": "German title" })
        );
    }

    #[test]
    fn test_add_chained() {
        let mut store = ResourceStore::new();
        store
            .add("de", json!({ "title": "German title" }))
            .and_then(|s| s.add("en", json!({ "title": "English title" })))
            .unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.has("de"));
        assert!(store.has("en"));
    }

    #[test]
    fn test_add_replaces_without_merge() {
        let mut store = ResourceStore::new();
        store.add("en", json!({ "a": "1", "b": "2" })).unwrap();
        store.add("en", json!({ "c": "3" })).unwrap();

        let tree = store.get("en").unwrap();
        assert!(tree.get("a").is_none());
        assert!(tree.get("b").is_none());
        assert_eq!(tree.get("c"), Some(&json!("3")));
    }

    #[test]
    fn test_add_rejects_bad_language() {
        let mut store = ResourceStore::new();

        let err = store.add("", json!({ "a": "b" })).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyLanguage);

        let err = store.add("d/e", json!({ "a": "b" })).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidLanguage);

        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_non_object_resource() {
        let mut store = ResourceStore::new();
        for value in [json!(null), json!(true), json!(1), json!("text"), json!([])] {
            let err = store.add("de", value).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidResource);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_empty_resource() {
        let mut store = ResourceStore::new();
        let err = store.add("de", json!({})).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyResource);
        assert!(!store.has("de"));
    }

    // ==================== remove Tests ====================

    #[test]
    fn test_remove_existing() {
        let mut store = ResourceStore::new();
        store.add("de", json!({ "t": "x" })).unwrap();
        store.add("en", json!({ "t": "y" })).unwrap();

        store.remove("de").unwrap();

        assert!(!store.has("de"));
        assert!(store.has("en"));
        assert!(store.get("de").is_none());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = ResourceStore::new();
        store.add("de", json!({ "t": "x" })).unwrap();

        store.remove("nl").unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_validates_language() {
        let mut store = ResourceStore::new();
        store.add("de", json!({ "t": "x" })).unwrap();

        assert_eq!(store.remove("").unwrap_err().code(), ErrorCode::EmptyLanguage);
        assert_eq!(
            store.remove("de.json").unwrap_err().code(),
            ErrorCode::InvalidLanguage
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_has_and_get_are_case_sensitive() {
        let mut store = ResourceStore::new();
        store.add("de", json!({ "title": "Titel" })).unwrap();

        assert!(store.has("de"));
        assert!(!store.has("DE"));
        assert!(store.get("de").is_some());
        assert!(store.get("DE").is_none());
        assert!(store.get("fr").is_none());
    }

    #[test]
    fn test_languages_sorted() {
        let mut store = ResourceStore::new();
        store.add("nl", json!({ "t": "x" })).unwrap();
        store.add("de", json!({ "t": "x" })).unwrap();
        store.add("en", json!({ "t": "x" })).unwrap();

        let ids: Vec<String> = store.languages().iter().map(|l| l.to_string()).collect();
        assert_eq!(ids, vec!["de", "en", "nl"]);
    }
}
