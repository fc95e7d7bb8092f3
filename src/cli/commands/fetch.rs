use std::sync::Arc;

use crate::cache::SharedCache;
use crate::catalog::SnapshotStore;
use crate::cli::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::feed::{CatalogSource, UpstreamFeed};
use crate::output::{self, RefreshSummary};
use crate::refresh::RefreshLoop;

/// Fetch the upstream feed once and write it to the shared cache
pub async fn fetch(config: &Config, paths: &Paths, format: OutputFormat) -> Result<String> {
    let feed = UpstreamFeed::from_config(config)?;
    let source = feed.describe();

    let refresh = RefreshLoop::new(feed, Arc::new(SnapshotStore::new()))
        .with_timeout(config.fetch_timeout()?);
    let snapshot = refresh.refresh_once().await?;

    let cache_dir = config.cache_dir(paths);
    SharedCache::in_dir(&cache_dir).write(&snapshot)?;
    tracing::info!(
        records = snapshot.record_count(),
        dir = %cache_dir.display(),
        "Wrote shared cache"
    );

    let summary = RefreshSummary {
        source,
        records: snapshot.record_count(),
        fetched_at: snapshot.fetched_at(),
        cache_dir,
    };
    output::format_refresh(&summary, format)
}
