use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::record::{ApplicationRecord, Platform};

/// Immutable point-in-time copy of the catalog
///
/// Derived views (title index, length-ordered names) are computed once here
/// so readers never build them on the query path. When titles repeat, the
/// first record in feed order owns the title.
#[derive(Debug)]
pub struct CatalogSnapshot {
    records: Vec<ApplicationRecord>,
    fetched_at: DateTime<Utc>,
    by_title: HashMap<String, usize>,
    names_by_length: Vec<String>,
}

impl CatalogSnapshot {
    pub fn new(records: Vec<ApplicationRecord>, fetched_at: DateTime<Utc>) -> Self {
        let mut by_title = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            by_title.entry(record.title.clone()).or_insert(idx);
        }

        let names_by_length = names_ordered_by_length(records.iter());

        Self {
            records,
            fetched_at,
            by_title,
            names_by_length,
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn all_records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Titles sorted by character length, shortest first
    pub fn names_ordered_by_length(&self) -> &[String] {
        &self.names_by_length
    }

    /// First record whose title matches exactly
    pub fn by_title(&self, name: &str) -> Option<&ApplicationRecord> {
        self.by_title.get(name).map(|&idx| &self.records[idx])
    }

    /// Records available on the given platform, in feed order
    pub fn by_platform(&self, platform: Platform) -> Vec<&ApplicationRecord> {
        self.records.iter().filter(|r| r.supports(platform)).collect()
    }

    /// Records narrowed by an optional platform filter
    pub fn universe(&self, platform: Option<Platform>) -> Vec<&ApplicationRecord> {
        match platform {
            Some(p) => self.by_platform(p),
            None => self.records.iter().collect(),
        }
    }
}

/// Stable sort of titles by length (equal lengths keep feed order)
pub(crate) fn names_ordered_by_length<'a>(
    records: impl Iterator<Item = &'a ApplicationRecord>,
) -> Vec<String> {
    let mut names: Vec<String> = records.map(|r| r.title.clone()).collect();
    names.sort_by_key(|name| name.chars().count());
    names
}
