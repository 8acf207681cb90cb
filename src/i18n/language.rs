//! Language identifier: validated key into the resource store.
//!
//! A `LanguageId` is a short, case-sensitive, non-empty code such as `"en"`,
//! `"de"` or `"pt-BR"`. Because bare ids are turned into resource locations
//! (`{base}/{id}.json`), only ASCII letters, digits, `-` and `_` are accepted.

use crate::error::{ErrorCode, Result, TranslatorError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::OnceLock;

static LANGUAGE_REGEX: OnceLock<Regex> = OnceLock::new();

/// A validated language identifier.
///
/// Deserializing runs the same validation as [`LanguageId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageId(String);

impl LanguageId {
    /// Validate and wrap a language code.
    ///
    /// # Errors
    /// * `EmptyLanguage` if `code` is empty
    /// * `InvalidLanguage` if `code` contains anything other than
    ///   `[A-Za-z0-9_-]`
    pub fn parse(code: &str) -> Result<LanguageId> {
        if code.is_empty() {
            return Err(TranslatorError::new(
                ErrorCode::EmptyLanguage,
                "language identifier must not be empty",
            ));
        }

        let regex = LANGUAGE_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
        if !regex.is_match(code) {
            return Err(TranslatorError::new(
                ErrorCode::InvalidLanguage,
                format!("\"{}\" is not a valid language identifier", code),
            ));
        }

        Ok(LanguageId(code.to_string()))
    }

    /// Primary subtag of a locale tag, truncated to two characters
    /// (`"de-DE"` → `"de"`, `"en_US.UTF-8"` → `"en"`).
    ///
    /// Returns `None` when the tag does not start with a usable code.
    pub fn from_locale(locale: &str) -> Option<LanguageId> {
        let primary: String = locale.chars().take(2).collect();
        if primary.chars().count() < 2 {
            return None;
        }
        LanguageId::parse(&primary).ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// English, the language used when nothing else is configured.
impl Default for LanguageId {
    fn default() -> Self {
        LanguageId("en".to_string())
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LanguageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for LanguageId {
    type Error = TranslatorError;

    fn try_from(code: &str) -> Result<Self> {
        LanguageId::parse(code)
    }
}

impl TryFrom<String> for LanguageId {
    type Error = TranslatorError;

    fn try_from(code: String) -> Result<Self> {
        LanguageId::parse(&code)
    }
}

impl From<LanguageId> for String {
    fn from(lang: LanguageId) -> Self {
        lang.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse Tests ====================

    #[test]
    fn test_parse_simple_code() {
        let lang = LanguageId::parse("de").expect("Should parse");
        assert_eq!(lang.as_str(), "de");
        assert_eq!(lang.to_string(), "de");
    }

    #[test]
    fn test_parse_region_code() {
        assert!(LanguageId::parse("pt-BR").is_ok());
        assert!(LanguageId::parse("zh_Hant").is_ok());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let lower = LanguageId::parse("en").unwrap();
        let upper = LanguageId::parse("EN").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_parse_empty() {
        let err = LanguageId::parse("").unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyLanguage);
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        for code in ["../de", "de.json", "d e", "en/us", " "] {
            let err = LanguageId::parse(code).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidLanguage, "code {:?}", code);
        }
    }

    // ==================== from_locale Tests ====================

    #[test]
    fn test_from_locale_truncates_to_primary_subtag() {
        assert_eq!(LanguageId::from_locale("de-DE").unwrap().as_str(), "de");
        assert_eq!(LanguageId::from_locale("en_US.UTF-8").unwrap().as_str(), "en");
        assert_eq!(LanguageId::from_locale("nl").unwrap().as_str(), "nl");
    }

    #[test]
    fn test_from_locale_rejects_short_or_garbage() {
        assert!(LanguageId::from_locale("").is_none());
        assert!(LanguageId::from_locale("e").is_none());
        assert!(LanguageId::from_locale("./").is_none());
    }

    // ==================== serde Tests ====================

    #[test]
    fn test_serde_uses_plain_string() {
        let lang = LanguageId::parse("pt-BR").unwrap();
        assert_eq!(serde_json::to_string(&lang).unwrap(), "\"pt-BR\"");

        let parsed: LanguageId = serde_json::from_str("\"de\"").unwrap();
        assert_eq!(parsed.as_str(), "de");
    }

    #[test]
    fn test_serde_rejects_invalid_code() {
        let result: std::result::Result<LanguageId, _> = serde_json::from_str("\"../de\"");
        assert!(result.is_err());
    }
}
