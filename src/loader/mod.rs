//! Resource loading: fetch one or many sources concurrently, tolerate partial
//! failure, and feed successes into the shared store.

mod fetch;
mod sources;

pub use fetch::{FetchFailure, FsFetcher, HttpFetcher, ResourceFetcher, StaticFetcher};
pub use sources::Sources;

use crate::diagnostics::Diagnostics;
use crate::error::ErrorCode;
use crate::i18n::{LanguageId, ResourceTree, SharedStore};
use futures::future::join_all;
use std::sync::{Arc, PoisonError};
use tracing::{info, warn};

/// A successfully loaded source.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedResource {
    /// Language id derived from the source.
    pub language: LanguageId,
    /// Location the resource was fetched from.
    pub location: String,
    pub tree: ResourceTree,
}

/// Loads language resources through an injected fetcher.
#[derive(Clone)]
pub struct ResourceLoader {
    fetcher: Arc<dyn ResourceFetcher>,
    store: SharedStore,
    diagnostics: Diagnostics,
    files_location: String,
}

impl ResourceLoader {
    /// Create a loader.
    ///
    /// # Arguments
    /// * `fetcher` - Transport used for every source
    /// * `store` - Store that persisting loads write into
    /// * `diagnostics` - Receives `FetchError` and `InvalidSourcesParameter`
    /// * `files_location` - Base path for bare language ids (e.g., "/i18n")
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        store: SharedStore,
        diagnostics: Diagnostics,
        files_location: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            store,
            diagnostics,
            files_location: files_location.into(),
        }
    }

    /// Fetch every source concurrently and wait for all of them to settle.
    ///
    /// Failed sources are reported as `FetchError` and left out of the result;
    /// the successes come back in source order. With `persist` set, each
    /// success is written into the store as soon as it settles. A malformed
    /// `sources` argument is reported as `InvalidSourcesParameter` and nothing
    /// is fetched.
    pub async fn load(&self, sources: impl Into<Sources>, persist: bool) -> Vec<LoadedResource> {
        let sources = sources.into();
        let entries = match sources.entries() {
            Ok(entries) => entries,
            Err(err) => {
                self.diagnostics.report_error(&err);
                return Vec::new();
            }
        };

        let total = entries.len();
        let settled = join_all(entries.iter().map(|source| self.load_one(source, persist))).await;
        let loaded: Vec<LoadedResource> = settled.into_iter().flatten().collect();

        info!(
            "Resource load complete: {} successful, {} failed",
            loaded.len(),
            total - loaded.len()
        );

        loaded
    }

    async fn load_one(&self, source: &str, persist: bool) -> Option<LoadedResource> {
        let (language, location) = match sources::locate(source, &self.files_location) {
            Ok(located) => located,
            Err(err) => {
                self.fetch_failed(source, err.message());
                return None;
            }
        };

        let value = match self.fetcher.fetch(&location).await {
            Ok(value) => value,
            Err(err) => {
                self.fetch_failed(&location, &err.to_string());
                return None;
            }
        };

        let tree = match ResourceTree::try_from(value) {
            Ok(tree) => tree,
            Err(err) => {
                self.fetch_failed(&location, err.message());
                return None;
            }
        };

        if persist {
            self.store
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(language.clone(), tree.clone());
        }

        info!("✓ Loaded \"{}\" from {}", language, location);

        Some(LoadedResource {
            language,
            location,
            tree,
        })
    }

    fn fetch_failed(&self, source: &str, reason: &str) {
        warn!("✗ Could not load {}: {}", source, reason);
        self.diagnostics.report(
            ErrorCode::FetchError,
            &format!("could not load \"{}\": {}", source, reason),
        );
    }
}
