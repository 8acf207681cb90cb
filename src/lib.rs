//! Load JSON language resources and translate keyed elements in place.
//!
//! ```rust
//! use page_translator::{Config, Runtime, StaticFetcher, Translator};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let config = Config {
//!     register_globally: None,
//!     ..Config::default()
//! };
//! let translator = Translator::new(config, Runtime::new(Arc::new(StaticFetcher::new())));
//! translator.add("en", json!({ "greeting": "Hello" }));
//!
//! assert_eq!(translator.translate_for_key("greeting", None).as_deref(), Some("Hello"));
//! ```

pub mod apply;
pub mod config;
pub mod diagnostics;
pub mod dom;
pub mod error;
pub mod global;
pub mod i18n;
pub mod loader;
pub mod runtime;
pub mod state;
pub mod translator;

pub use apply::ApplyReport;
pub use config::{Config, Selector};
pub use diagnostics::{DiagnosticSink, Diagnostics, RecordingSink, TracingSink};
pub use dom::{ElementLocator, ElementRef, MemoryDocument, MemoryElement, TranslatableElement};
pub use error::{ErrorCode, TranslatorError};
pub use global::{Shortcut, ShortcutRegistry};
pub use i18n::{LanguageId, ResourceStore};
pub use loader::{
    FsFetcher, HttpFetcher, LoadedResource, ResourceFetcher, Sources, StaticFetcher,
};
pub use runtime::Runtime;
pub use state::{
    EnvLocale, FilePersistence, FixedLocales, LocaleProvider, MemoryPersistence, Persistence,
};
pub use translator::Translator;
