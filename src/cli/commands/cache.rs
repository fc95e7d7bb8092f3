//! Cache management commands

use colored::Colorize;

use crate::cache::{self, SharedCache};
use crate::cli::args::{CacheArgs, CacheCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::Result;
use crate::output::pretty;

/// Handle cache commands
pub fn cache(config: &Config, paths: &Paths, args: &CacheArgs, format: OutputFormat) -> Result<String> {
    let cache_dir = config.cache_dir(paths);

    match &args.command {
        CacheCommands::Status => {
            let status = cache::status(&cache_dir);
            match format {
                OutputFormat::Pretty => Ok(pretty::format_cache_status(
                    &status,
                    &cache_dir.display().to_string(),
                    config.refresh.interval_secs,
                )),
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "cache_dir": cache_dir.to_string_lossy(),
                        "catalog": status.catalog,
                    });
                    Ok(serde_json::to_string_pretty(&json)?)
                }
            }
        }
        CacheCommands::Clear => {
            SharedCache::in_dir(&cache_dir).clear()?;
            match format {
                OutputFormat::Pretty => Ok(format!("{} Cache cleared", "✓".green())),
                OutputFormat::Json => {
                    Ok(serde_json::to_string_pretty(&serde_json::json!({ "status": "cleared" }))?)
                }
            }
        }
    }
}
