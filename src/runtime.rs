//! Capabilities the translator depends on, chosen once at startup.
//!
//! Two presets cover the usual hosts. [`Runtime::network`] is for interactive,
//! browser-like hosts: it fetches over HTTP, detects the locale from the
//! environment and keeps preferences in memory. [`Runtime::filesystem`] is for
//! headless hosts: it reads from disk and has no locale, persistence or
//! document. Builder methods swap out individual capabilities.

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::dom::ElementLocator;
use crate::loader::{FsFetcher, HttpFetcher, ResourceFetcher};
use crate::state::{EnvLocale, LocaleProvider, MemoryPersistence, Persistence};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct Runtime {
    pub fetcher: Arc<dyn ResourceFetcher>,
    pub locator: Option<Arc<dyn ElementLocator>>,
    pub persistence: Option<Arc<dyn Persistence>>,
    pub locale: Option<Arc<dyn LocaleProvider>>,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl Runtime {
    /// Bare runtime around a fetcher: no document, persistence or locale.
    pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            fetcher,
            locator: None,
            persistence: None,
            locale: None,
            sink: Arc::new(TracingSink),
        }
    }

    /// Interactive preset fetching resources relative to `base_url`.
    pub fn network(base_url: &str) -> Result<Self> {
        let fetcher = HttpFetcher::with_base(base_url)?;
        Ok(Self::new(Arc::new(fetcher))
            .with_persistence(Arc::new(MemoryPersistence::new()))
            .with_locale(Arc::new(EnvLocale)))
    }

    /// Headless preset reading resources from `root`.
    pub fn filesystem(root: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FsFetcher::new(root)))
    }

    pub fn with_locator(mut self, locator: Arc<dyn ElementLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn Persistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_locale(mut self, locale: Arc<dyn LocaleProvider>) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Whether element locating is available.
    pub fn has_document(&self) -> bool {
        self.locator.is_some()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("locator", &self.locator.is_some())
            .field("persistence", &self.persistence.is_some())
            .field("locale", &self.locale.is_some())
            .finish_non_exhaustive()
    }
}
