//! Where dataset files come from.
//!
//! Every resource is addressed by a path relative to the data root
//! (`data/all.json`, `data/<project>-<id>.json`, ...). The root is either a base
//! URL served over HTTP or a local directory with the same layout.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::error::SourceError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the raw bytes stored at `path`, relative to the data root.
    async fn get(&self, path: &str) -> Result<Vec<u8>>;

    /// Human readable location of the data root.
    fn describe(&self) -> String;
}

pub async fn fetch_json<T: DeserializeOwned>(source: &dyn DataSource, path: &str) -> Result<T> {
    let bytes = source.get(path).await?;
    serde_json::from_slice(&bytes).map_err(|source| SourceError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Pick a source for `location`: `http(s)://` and `file://` URLs, or a plain path.
pub fn open_source(location: &str, timeout: Duration) -> Result<Arc<dyn DataSource>> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            Ok(Arc::new(HttpSource::new(url, timeout)?))
        }
        Ok(url) if url.scheme() == "file" => {
            let root = url.to_file_path().map_err(|()| SourceError::InvalidLocation {
                location: location.to_string(),
                reason: "not a local file URL".to_string(),
            })?;
            Ok(Arc::new(DirSource::new(root)))
        }
        // Windows drive letters parse as a one-letter scheme.
        Ok(url) if url.scheme().len() > 1 => Err(SourceError::InvalidLocation {
            location: location.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        _ => Ok(Arc::new(DirSource::new(PathBuf::from(location)))),
    }
}

#[derive(Clone, Debug)]
pub struct HttpSource {
    http: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Client)?;
        Ok(Self { http, base })
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| SourceError::InvalidLocation {
                location: path.to_string(),
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.url_for(path)?;
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| SourceError::Request {
                url: url.to_string(),
                source,
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }
        let bytes = resp.bytes().await.map_err(|source| SourceError::Request {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(SourceError::OutsideRoot {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DataSource for DirSource {
    async fn get(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.resolve(path)?;
        debug!(path = %full.display(), "read");
        tokio::fs::read(&full)
            .await
            .map_err(|source| SourceError::Read { path: full, source })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
