//! Language resources: identifiers, the resource cache and key resolution.
//!
//! # Architecture
//!
//! - `language`: validated `LanguageId`
//! - `store`: `ResourceStore`, the in-memory language → tree cache
//! - `resolver`: dotted key-path lookup with default-language fallback
//!
//! # Example
//!
//! ```rust
//! use page_translator::i18n::{resolve, ResourceStore};
//! use serde_json::json;
//!
//! let mut store = ResourceStore::new();
//! store.add("en", json!({ "nav": { "home": "Home" } })).unwrap();
//!
//! let tree = store.get("en").unwrap();
//! assert_eq!(resolve(tree, "nav.home"), Some("Home"));
//! ```

mod language;
mod resolver;
mod store;

pub use language::LanguageId;
pub use resolver::{resolve, resolve_with_fallback, Resolution};
pub use store::{ResourceStore, ResourceTree, SharedStore};
