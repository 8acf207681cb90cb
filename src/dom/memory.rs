//! In-memory document for headless hosts and tests.
//!
//! Supports a small selector subset: `*`, `tag`, `[attr]`, `[attr="value"]`,
//! `tag[attr]`, `tag[attr="value"]`, and comma-separated lists of those.

use super::{ElementLocator, ElementRef, TranslatableElement};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

static SELECTOR_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Default)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    content: String,
}

/// Cloneable handle to an in-memory element.
#[derive(Debug, Clone)]
pub struct MemoryElement {
    inner: Arc<RwLock<ElementData>>,
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ElementData {
                tag: tag.to_ascii_lowercase(),
                ..ElementData::default()
            })),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style content setter.
    pub fn with_content(self, content: &str) -> Self {
        self.set_content(content);
        self
    }

    pub fn tag(&self) -> String {
        self.data().tag.clone()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.data().attributes.contains_key(name)
    }

    /// Whether two handles point at the same element.
    pub fn same_element(&self, other: &MemoryElement) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn data(&self) -> std::sync::RwLockReadGuard<'_, ElementData> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn data_mut(&self) -> std::sync::RwLockWriteGuard<'_, ElementData> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TranslatableElement for MemoryElement {
    fn attribute(&self, name: &str) -> Option<String> {
        self.data().attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.data_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn content(&self) -> String {
        self.data().content.clone()
    }

    fn set_content(&self, value: &str) {
        self.data_mut().content = value.to_string();
    }
}

/// One parsed simple selector.
#[derive(Debug, PartialEq, Eq)]
struct SimpleSelector {
    tag: Option<String>,
    attribute: Option<(String, Option<String>)>,
}

impl SimpleSelector {
    fn parse(raw: &str) -> Option<Self> {
        let regex = SELECTOR_REGEX.get_or_init(|| {
            Regex::new(
                r#"^(\*|[A-Za-z][A-Za-z0-9-]*)?(?:\[([A-Za-z_:][-A-Za-z0-9_:.]*)(?:=["']?([^"'\]]*)["']?)?\])?$"#,
            )
            .unwrap()
        });

        let caps = regex.captures(raw.trim())?;
        let tag = caps.get(1).map(|m| m.as_str().to_ascii_lowercase());
        let attribute = caps.get(2).map(|name| {
            (
                name.as_str().to_string(),
                caps.get(3).map(|v| v.as_str().to_string()),
            )
        });

        if tag.is_none() && attribute.is_none() {
            return None;
        }

        Some(Self {
            tag: tag.filter(|t| t != "*"),
            attribute,
        })
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        if let Some(tag) = &self.tag {
            if element.tag() != *tag {
                return false;
            }
        }
        match &self.attribute {
            None => true,
            Some((name, None)) => element.has_attribute(name),
            Some((name, Some(value))) => element.attribute(name).as_deref() == Some(value),
        }
    }
}

/// Flat, ordered collection of elements plus the document language.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: RwLock<Vec<MemoryElement>>,
    language: RwLock<Option<String>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return a handle to it.
    pub fn append(&self, element: MemoryElement) -> MemoryElement {
        self.elements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(element.clone());
        element
    }

    /// Detach an element; other handles keep working but it is no longer located.
    pub fn remove(&self, element: &MemoryElement) {
        self.elements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|el| !el.same_element(element));
    }

    /// Elements matching `query`, in document order.
    pub fn query(&self, query: &str) -> Vec<MemoryElement> {
        let selectors: Vec<SimpleSelector> =
            query.split(',').filter_map(SimpleSelector::parse).collect();
        if selectors.is_empty() {
            return Vec::new();
        }

        self.elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|el| selectors.iter().any(|s| s.matches(el)))
            .cloned()
            .collect()
    }

    /// The language last recorded via [`ElementLocator::set_document_language`].
    pub fn language(&self) -> Option<String> {
        self.language
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ElementLocator for MemoryDocument {
    fn locate(&self, query: &str) -> Vec<ElementRef> {
        self.query(query)
            .into_iter()
            .map(|el| Arc::new(el) as ElementRef)
            .collect()
    }

    fn set_document_language(&self, lang: &str) {
        let mut current = self.language.write().unwrap_or_else(PoisonError::into_inner);
        if current.as_deref() != Some(lang) {
            *current = Some(lang.to_string());
        }
    }
}
