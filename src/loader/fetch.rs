//! Resource fetchers: the I/O side of loading.
//!
//! The loader never decides how bytes are obtained; it calls a
//! [`ResourceFetcher`] picked when the runtime is assembled. `HttpFetcher`
//! serves browser-like hosts, `FsFetcher` serves headless ones, and
//! `StaticFetcher` serves resources compiled into or held by the host.

use anyhow::Context;
use futures::future::BoxFuture;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Why a single source could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error("invalid resource location \"{0}\"")]
    InvalidLocation(String),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(StatusCode),

    #[error("resource not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Obtains the parsed JSON behind a resource location.
pub trait ResourceFetcher: Send + Sync {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Value, FetchFailure>>;
}

// ==================== Network ====================

/// Fetches resources over HTTP relative to a base URL.
///
/// Timeouts are whatever the supplied `reqwest::Client` enforces; failures are
/// not retried.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build a fetcher with a default client for the given base URL.
    pub fn with_base(base_url: &str) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
        Ok(Self::new(reqwest::Client::new(), base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get(&self, location: &str) -> Result<Value, FetchFailure> {
        let url = self
            .base_url
            .join(location)
            .map_err(|_| FetchFailure::InvalidLocation(location.to_string()))?;

        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Value, FetchFailure>> {
        Box::pin(self.get(location))
    }
}

// ==================== Filesystem ====================

/// Reads resources from disk relative to a root directory.
///
/// Locations are treated as root-relative, so `/i18n/de.json` reads
/// `{root}/i18n/de.json`.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    async fn read(&self, location: &str) -> Result<Value, FetchFailure> {
        let path = self.root.join(location.trim_start_matches('/'));
        debug!("Reading {}", path.display());

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(FetchFailure::NotFound(path)),
            Err(source) => return Err(FetchFailure::Io { path, source }),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl ResourceFetcher for FsFetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Value, FetchFailure>> {
        Box::pin(self.read(location))
    }
}

// ==================== In-memory ====================

/// Serves resources from a fixed location → JSON map.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    resources: HashMap<String, Value>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the JSON served at `location`.
    pub fn with(mut self, location: impl Into<String>, value: Value) -> Self {
        self.resources.insert(location.into(), value);
        self
    }
}

impl ResourceFetcher for StaticFetcher {
    fn fetch<'a>(&'a self, location: &'a str) -> BoxFuture<'a, Result<Value, FetchFailure>> {
        let result = self
            .resources
            .get(location)
            .cloned()
            .ok_or_else(|| FetchFailure::NotFound(PathBuf::from(location)));
        Box::pin(async move { result })
    }
}
