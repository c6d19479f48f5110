//! Source dataset resolution: local paths pass through, remote CSVs are
//! downloaded once and cached
//!
//! The analytics core never fetches anything — it consumes in-memory
//! tables. This module is the external collaborator that turns a dataset
//! reference (path or URL) into a local file, with an explicit cache:
//! the key is the source URL, staleness is a configured max age (the
//! upstream portal updates daily), and invalidation is a method call, not
//! an ambient side effect.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::CacheConfig;

/// Production dataset on the energy open-data portal
pub const PRODUCTION_DATASET_URL: &str = "http://datos.energia.gob.ar/dataset/c846e79c-026c-4040-897f-1ad3543b407c/resource/b5b58cdc-9e07-41f9-b392-fb9ec68b0725/download/produccin-de-pozos-de-gas-y-petrleo-no-convencional.csv";

/// Fracture adjunct dataset (daily refresh)
pub const FRACTURE_DATASET_URL: &str = "http://datos.energia.gob.ar/dataset/71fa2e84-0316-4a1b-af68-7f35e41f58d7/resource/2280ad92-6ed3-403e-a095-50139863ab0d/download/datos-de-fractura-de-pozos-de-hidrocarburos-adjunto-iv-actualizacin-diaria.csv";

/// Source resolution failure
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("download failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{0}' is not cached and offline mode is enabled")]
    NotCached(String),
}

/// Download-and-cache manager for remote dataset files.
///
/// Each URL maps to one file in the cache directory, named from a stable
/// hash of the URL plus its original filename. Cached files older than
/// `max_age` are re-downloaded; `offline` serves the cache only.
pub struct DatasetCache {
    cache_dir: PathBuf,
    max_age: Option<Duration>,
    offline: bool,
    client: Option<reqwest::blocking::Client>,
}

impl DatasetCache {
    /// Create a cache rooted at `dir` (platform cache dir when `None`).
    pub fn new(
        dir: Option<PathBuf>,
        max_age: Option<Duration>,
        offline: bool,
    ) -> Result<Self, SourceError> {
        let cache_dir = dir.unwrap_or_else(default_cache_dir);
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            max_age,
            offline,
            client: None,
        })
    }

    /// Build from the analysis config's cache section.
    pub fn from_config(config: &CacheConfig, offline: bool) -> Result<Self, SourceError> {
        Self::new(
            config.dir.clone(),
            Some(Duration::from_secs(config.max_age_hours * 3600)),
            offline,
        )
    }

    /// Resolve a dataset reference to a local file path.
    ///
    /// Anything that does not look like an HTTP(S) URL is treated as a
    /// local path and passed through untouched.
    pub fn resolve(&mut self, source: &str) -> Result<PathBuf, SourceError> {
        if !is_url(source) {
            return Ok(PathBuf::from(source));
        }

        let dest = self.cache_path(source);
        if dest.exists() && !self.is_stale(&dest) {
            debug!(url = source, path = %dest.display(), "Cache hit");
            return Ok(dest);
        }

        if self.offline {
            if dest.exists() {
                // Stale beats nothing when we cannot download
                return Ok(dest);
            }
            return Err(SourceError::NotCached(source.to_string()));
        }

        self.download(source, &dest)?;
        Ok(dest)
    }

    /// Drop the cached copy of one URL.
    pub fn invalidate(&self, url: &str) -> Result<(), SourceError> {
        let path = self.cache_path(url);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<(), SourceError> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Cache file for a URL: short URL hash + the remote filename.
    fn cache_path(&self, url: &str) -> PathBuf {
        let name = url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("dataset.csv");
        self.cache_dir.join(format!("{:016x}-{name}", fnv1a64(url)))
    }

    fn is_stale(&self, path: &Path) -> bool {
        let Some(max_age) = self.max_age else {
            return false;
        };
        match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => modified
                .elapsed()
                .map_or(false, |age| age > max_age),
            Err(_) => true,
        }
    }

    /// Lazy HTTP client; cloning is cheap, the client wraps an Arc around
    /// its connection pool.
    fn client(&mut self) -> Result<reqwest::blocking::Client, SourceError> {
        match self.client.clone() {
            Some(client) => Ok(client),
            None => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(300))
                    .build()?;
                self.client = Some(client.clone());
                Ok(client)
            }
        }
    }

    /// Download to a temp file first and rename on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download(&mut self, url: &str, dest: &Path) -> Result<(), SourceError> {
        info!(url, "Downloading dataset");

        let client = self.client()?;
        let tmp = dest.with_extension("tmp");
        let result = (|| -> Result<(), SourceError> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp, &bytes)?;
            fs::rename(&tmp, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("capiv")
}

/// FNV-1a, enough to keep distinct URLs from colliding in the cache dir.
fn fnv1a64(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
