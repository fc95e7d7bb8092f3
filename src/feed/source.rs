use std::future::Future;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::client::UpstreamFeed;
use crate::cache::SharedCache;
use crate::catalog::CatalogSnapshot;
use crate::config::{Config, Paths, SourceKind};
use crate::error::{Result, UdbError};

/// Something the refresh loop can build a snapshot from
pub trait CatalogSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<CatalogSnapshot>> + Send;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

impl CatalogSource for UpstreamFeed {
    async fn fetch(&self) -> Result<CatalogSnapshot> {
        let records = self.fetch_records().await?;
        Ok(CatalogSnapshot::new(records, Utc::now()))
    }

    fn describe(&self) -> String {
        format!("upstream {}", self.url())
    }
}

/// Reads snapshots written by a batch fetcher into the shared cache
#[derive(Debug, Clone)]
pub struct SharedCacheSource {
    dir: PathBuf,
}

impl SharedCacheSource {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl CatalogSource for SharedCacheSource {
    async fn fetch(&self) -> Result<CatalogSnapshot> {
        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || SharedCache::in_dir(&dir).read())
            .await
            .map_err(|e| UdbError::Io(std::io::Error::other(e)))?
    }

    fn describe(&self) -> String {
        format!("shared cache {}", self.dir.display())
    }
}

/// Source selected by configuration
#[derive(Debug, Clone)]
pub enum FeedSource {
    Upstream(UpstreamFeed),
    Shared(SharedCacheSource),
}

impl FeedSource {
    /// Build the configured source
    pub fn from_config(config: &Config, paths: &Paths) -> Result<Self> {
        Ok(match config.refresh.source {
            SourceKind::Upstream => Self::Upstream(UpstreamFeed::from_config(config)?),
            SourceKind::Shared => Self::Shared(SharedCacheSource::new(&config.cache_dir(paths))),
        })
    }
}

impl CatalogSource for FeedSource {
    async fn fetch(&self) -> Result<CatalogSnapshot> {
        match self {
            Self::Upstream(feed) => feed.fetch().await,
            Self::Shared(cache) => cache.fetch().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Upstream(feed) => feed.describe(),
            Self::Shared(cache) => cache.describe(),
        }
    }
}
