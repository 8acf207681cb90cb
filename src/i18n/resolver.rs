//! Dotted key-path resolution with default-language fallback.

use crate::i18n::{ResourceStore, ResourceTree};
use serde_json::Value;

/// Outcome of resolving a key against a target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Found in the target language.
    Found(&'a str),
    /// Missing in the target language, found in the default language.
    Fallback(&'a str),
    /// Found nowhere.
    Missing,
}

impl<'a> Resolution<'a> {
    /// The value to use, whether it came from the target or the fallback.
    pub fn value(&self) -> Option<&'a str> {
        match self {
            Resolution::Found(v) | Resolution::Fallback(v) => Some(*v),
            Resolution::Missing => None,
        }
    }

    /// Whether the key was present in the target language itself.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Walk `key_path` through `tree`.
///
/// Returns `None` if any segment is empty or missing, an intermediate value
/// is not an object, or the leaf is not a string.
pub fn resolve<'a>(tree: &'a ResourceTree, key_path: &str) -> Option<&'a str> {
    if key_path.split('.').any(str::is_empty) {
        return None;
    }
    let mut segments = key_path.split('.');
    let mut current = tree.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    current.as_str()
}

/// Resolve against `lang`, falling back to `default_lang` when it differs and
/// is registered.
///
/// A `Fallback` result still means the key is missing in `lang`; callers
/// report it the same way as `Missing`.
pub fn resolve_with_fallback<'a>(
    store: &'a ResourceStore,
    key_path: &str,
    lang: &str,
    default_lang: &str,
) -> Resolution<'a> {
    if let Some(value) = store.get(lang).and_then(|tree| resolve(tree, key_path)) {
        return Resolution::Found(value);
    }

    if default_lang != lang {
        if let Some(value) = store
            .get(default_lang)
            .and_then(|tree| resolve(tree, key_path))
        {
            return Resolution::Fallback(value);
        }
    }

    Resolution::Missing
}
