pub mod json;
pub mod pretty;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::ApplicationRecord;
use crate::cli::OutputFormat;
use crate::error::Result;

/// Outcome of a batch refresh into the shared cache
#[derive(Debug, Serialize)]
pub struct RefreshSummary {
    pub source: String,
    pub records: usize,
    pub fetched_at: DateTime<Utc>,
    pub cache_dir: PathBuf,
}

/// Format a list of records based on output format
pub fn format_records(records: &[ApplicationRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_records(records)),
        OutputFormat::Json => json::format_records(records),
    }
}

/// Format a single record based on output format
pub fn format_record(record: &ApplicationRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_record(record)),
        OutputFormat::Json => json::format_record(record),
    }
}

/// Format a batch refresh summary based on output format
pub fn format_refresh(summary: &RefreshSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_refresh(summary)),
        OutputFormat::Json => json::format_json(summary),
    }
}
