//! Cache module for sharing the catalog between processes
//!
//! One process fetches the upstream feed and writes it here; any number of
//! serving processes build their snapshots from it.

mod shared;

pub use shared::{FileStore, KeyValueStore, SharedCache, CATALOG_KEY, INTEGRITY_KEY};

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Get cache status information
pub fn status(cache_dir: &Path) -> CacheStatus {
    let catalog = SharedCache::in_dir(cache_dir).status();

    CacheStatus { catalog }
}

/// Overall cache status
#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub catalog: CacheEntryStatus,
}

/// Status of a single cache entry
#[derive(Debug, Serialize)]
pub struct CacheEntryStatus {
    pub exists: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub age_secs: Option<u64>,
    pub count: Option<usize>,
}
