//! Offline queries against the shared cache

use std::sync::Arc;

use crate::cache::SharedCache;
use crate::catalog::SnapshotStore;
use crate::cli::args::{GetArgs, SearchArgs};
use crate::cli::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::output;
use crate::query::QueryService;

fn load_service(config: &Config, paths: &Paths) -> Result<QueryService> {
    let snapshot = SharedCache::in_dir(&config.cache_dir(paths)).read()?;
    let store = Arc::new(SnapshotStore::new());
    store.publish(snapshot);
    Ok(QueryService::new(store, config.query_settings()?))
}

/// Handle the search command
pub fn search(
    config: &Config,
    paths: &Paths,
    args: &SearchArgs,
    format: OutputFormat,
) -> Result<String> {
    let service = load_service(config, paths)?;
    let limit = args.limit.unwrap_or(config.search.limit);
    let results = service.search(&args.query, args.system, Some(limit))?;
    output::format_records(&results, format)
}

/// Handle the get command
pub fn get(config: &Config, paths: &Paths, args: &GetArgs, format: OutputFormat) -> Result<String> {
    let service = load_service(config, paths)?;
    let record = service.exact_get(&args.title)?;
    output::format_record(&record, format)
}
