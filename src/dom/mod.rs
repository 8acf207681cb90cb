//! Element abstraction.
//!
//! The engine never queries a document itself. A host supplies an
//! [`ElementLocator`] that turns a selector into attribute-bearing element
//! handles; [`MemoryDocument`] is the in-process implementation used by
//! headless hosts and tests.

mod memory;

pub use memory::{MemoryDocument, MemoryElement};

use std::sync::Arc;

/// Attribute holding the whitespace-separated key paths.
pub const KEYS_ATTRIBUTE: &str = "data-i18n";

/// Attribute holding the whitespace-separated target attribute names.
pub const ATTRS_ATTRIBUTE: &str = "data-i18n-attr";

/// Shared handle to a located element.
pub type ElementRef = Arc<dyn TranslatableElement>;

/// A node whose attributes and primary content can be read and written.
///
/// Handles use interior mutability, like DOM node references: writing through
/// one handle is visible through every clone.
pub trait TranslatableElement: Send + Sync {
    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str);

    /// The element's primary content (its inner markup).
    fn content(&self) -> String;

    fn set_content(&self, value: &str);

    fn read(&self, target: &Target) -> Option<String> {
        match target {
            Target::Content => Some(self.content()),
            Target::Attribute(name) => self.attribute(name),
        }
    }

    fn write(&self, target: &Target, value: &str) {
        match target {
            Target::Content => self.set_content(value),
            Target::Attribute(name) => self.set_attribute(name, value),
        }
    }
}

/// Finds translatable elements for a selector query.
pub trait ElementLocator: Send + Sync {
    fn locate(&self, query: &str) -> Vec<ElementRef>;

    /// Record the language the document is now displayed in.
    fn set_document_language(&self, _lang: &str) {}
}

/// Where a resolved value is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The element's primary content.
    Content,
    Attribute(String),
}

/// Translation instructions read from one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSpec {
    pub keys: Vec<String>,
    /// Explicit attribute names; empty means "primary content".
    pub attributes: Vec<String>,
}

impl TranslationSpec {
    /// Read the key and attribute lists from an element.
    ///
    /// Returns `None` when the element carries no keys at all.
    pub fn from_element(element: &dyn TranslatableElement) -> Option<Self> {
        let keys = split_list(element.attribute(KEYS_ATTRIBUTE));
        if keys.is_empty() {
            return None;
        }
        let attributes = split_list(element.attribute(ATTRS_ATTRIBUTE));
        Some(Self { keys, attributes })
    }

    /// Whether an attribute list is present and its length differs from the
    /// key count.
    pub fn is_mismatched(&self) -> bool {
        !self.attributes.is_empty() && self.attributes.len() != self.keys.len()
    }

    /// Pair each key with its target.
    ///
    /// Returns `None` when several keys meet an attribute list of a different
    /// length. A single key is paired with the first attribute and any extra
    /// attributes are ignored.
    pub fn pairs(&self) -> Option<Vec<(&str, Target)>> {
        if self.attributes.is_empty() {
            return Some(
                self.keys
                    .iter()
                    .map(|key| (key.as_str(), Target::Content))
                    .collect(),
            );
        }

        if self.keys.len() > 1 && self.is_mismatched() {
            return None;
        }

        Some(
            self.keys
                .iter()
                .zip(&self.attributes)
                .map(|(key, attr)| (key.as_str(), Target::Attribute(attr.clone())))
                .collect(),
        )
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
