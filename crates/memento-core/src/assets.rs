//! Sources for the site's static resources (JSON catalogs, Markdown bodies).

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::util::{compact_body, is_http_url};

/// Fetches a resource by its site-relative path.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    async fn fetch_text(&self, path: &str) -> Result<String>;

    /// Fetch and parse a JSON document.
    async fn fetch_json(&self, path: &str) -> Result<serde_json::Value> {
        let raw = self.fetch_text(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Reads resources from a local copy of the site.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirAssets {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let full_path = self.root.join(path.trim_start_matches('/'));
        match tokio::fs::read_to_string(&full_path).await {
            Ok(text) => Ok(text),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::AssetStatus {
                    path: path.to_string(),
                    status: 404,
                    body: String::new(),
                })
            }
            Err(error) => Err(error.into()),
        }
    }
}

/// Fetches resources from a deployed copy of the site.
#[derive(Debug, Clone)]
pub struct HttpAssets {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAssets {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !is_http_url(base_url) {
            return Err(Error::InvalidInput(
                "site base URL must include http:// or https://".to_string(),
            ));
        }

        // requests carry no timeout
        Ok(Self {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl AssetSource for HttpAssets {
    async fn fetch_text(&self, path: &str) -> Result<String> {
        let response = self.client.get(self.url_for(path)).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AssetStatus {
                path: path.to_string(),
                status,
                body: compact_body(&body),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex, PoisonError};

    use super::AssetSource;
    use crate::error::{Error, Result};

    /// In-memory site with a shared fetch counter; clones share both.
    #[derive(Clone, Default)]
    pub struct StaticAssets {
        files: Arc<Mutex<HashMap<String, String>>>,
        fetches: Arc<AtomicUsize>,
    }

    impl StaticAssets {
        pub fn with(path: &str, body: &str) -> Self {
            let assets = Self::default();
            assets.put(path, body);
            assets
        }

        pub fn put(&self, path: &str, body: &str) {
            self.files
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(path.to_string(), body.to_string());
        }

        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl AssetSource for StaticAssets {
        async fn fetch_text(&self, path: &str) -> Result<String> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.files
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(path)
                .cloned()
                .ok_or_else(|| Error::AssetStatus {
                    path: path.to_string(),
                    status: 404,
                    body: String::new(),
                })
        }
    }
}
