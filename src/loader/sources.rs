//! The `sources` argument of a load: one or many ids or paths.

use crate::error::{ErrorCode, Result, TranslatorError};
use crate::i18n::LanguageId;
use serde_json::Value;
use std::path::Path;

/// One source or an ordered list of them.
///
/// Each entry is either a bare language id (`"de"`), resolved to
/// `{files_location}/de.json`, or an explicit path carrying a file extension
/// (`"/locales/de.json"`), used as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sources {
    Single(String),
    Many(Vec<String>),
}

impl Sources {
    /// Validated entries in order.
    ///
    /// # Errors
    /// `InvalidSourcesParameter` for an empty list or an empty entry.
    pub fn entries(&self) -> Result<Vec<&str>> {
        let entries: Vec<&str> = match self {
            Sources::Single(source) => vec![source.as_str()],
            Sources::Many(sources) => sources.iter().map(String::as_str).collect(),
        };

        if entries.is_empty() {
            return Err(invalid("expected at least one source"));
        }
        if entries.iter().any(|entry| entry.trim().is_empty()) {
            return Err(invalid("sources must not contain empty entries"));
        }

        Ok(entries)
    }
}

fn invalid(message: &str) -> TranslatorError {
    TranslatorError::new(ErrorCode::InvalidSourcesParameter, message)
}

impl From<&str> for Sources {
    fn from(source: &str) -> Self {
        Sources::Single(source.to_string())
    }
}

impl From<String> for Sources {
    fn from(source: String) -> Self {
        Sources::Single(source)
    }
}

impl From<Vec<String>> for Sources {
    fn from(sources: Vec<String>) -> Self {
        Sources::Many(sources)
    }
}

impl From<Vec<&str>> for Sources {
    fn from(sources: Vec<&str>) -> Self {
        Sources::Many(sources.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Sources {
    fn from(sources: &[&str]) -> Self {
        Sources::Many(sources.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Sources {
    fn from(sources: [&str; N]) -> Self {
        Sources::Many(sources.iter().map(|s| s.to_string()).collect())
    }
}

/// Accepts a JSON string or array of strings, e.g. from a host config file.
impl TryFrom<&Value> for Sources {
    type Error = TranslatorError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(source) => Ok(Sources::Single(source.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid("every source must be a string"))
                })
                .collect::<Result<Vec<_>>>()
                .map(Sources::Many),
            _ => Err(invalid("sources must be a string or an array of strings")),
        }
    }
}

/// Derive the language id and fetch location for one entry.
pub(crate) fn locate(source: &str, files_location: &str) -> Result<(LanguageId, String)> {
    let path = Path::new(source);
    if path.extension().is_some() {
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let language = LanguageId::parse(stem)?;
        return Ok((language, source.to_string()));
    }

    let language = LanguageId::parse(source)?;
    let location = format!("{}/{}.json", files_location.trim_end_matches('/'), language);
    Ok((language, location))
}
