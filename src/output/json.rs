use serde::Serialize;

use crate::catalog::ApplicationRecord;
use crate::error::Result;

/// Format records as JSON
pub fn format_records(records: &[ApplicationRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Format a single record as JSON
pub fn format_record(record: &ApplicationRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Format any serializable value as JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
