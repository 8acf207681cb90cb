//! Error taxonomy shared by every component.
//!
//! Data and availability failures are signalled rather than fatal: component
//! APIs return [`TranslatorError`], and the [`Translator`](crate::Translator)
//! façade turns those into diagnostics reports instead of propagating them.

use std::fmt;

/// Stable identifier for each failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidLanguage,
    EmptyLanguage,
    InvalidResource,
    EmptyResource,
    InvalidParamKey,
    EmptyParamKey,
    InvalidSourcesParameter,
    NoLanguageRegistered,
    TranslationNotFound,
    MismatchingAttributes,
    FetchError,
    InvalidEnvironment,
}

impl ErrorCode {
    /// The wire name used in log lines (e.g. `INVALID_PARAM_LANGUAGE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidLanguage => "INVALID_PARAM_LANGUAGE",
            ErrorCode::EmptyLanguage => "EMPTY_PARAM_LANGUAGE",
            ErrorCode::InvalidResource => "INVALID_PARAM_JSON",
            ErrorCode::EmptyResource => "EMPTY_PARAM_JSON",
            ErrorCode::InvalidParamKey => "INVALID_PARAM_KEY",
            ErrorCode::EmptyParamKey => "EMPTY_PARAM_KEY",
            ErrorCode::InvalidSourcesParameter => "INVALID_PARAMETER_SOURCES",
            ErrorCode::NoLanguageRegistered => "NO_LANGUAGE_REGISTERED",
            ErrorCode::TranslationNotFound => "TRANSLATION_NOT_FOUND",
            ErrorCode::MismatchingAttributes => "MISMATCHING_ATTRIBUTES",
            ErrorCode::FetchError => "FETCH_ERROR",
            ErrorCode::InvalidEnvironment => "INVALID_ENVIRONMENT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure detected by one operation, tagged with its [`ErrorCode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct TranslatorError {
    code: ErrorCode,
    message: String,
}

impl TranslatorError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable context without the code prefix.
    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type Result<T, E = TranslatorError> = std::result::Result<T, E>;
