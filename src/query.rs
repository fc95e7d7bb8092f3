//! Read operations over the current catalog snapshot
//!
//! Every operation loads the current snapshot exactly once and works on that
//! snapshot for its whole duration, so a concurrent refresh can never mix two
//! catalogs into one answer.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::catalog::{names_ordered_by_length, ApplicationRecord, Platform, SnapshotStore};
use crate::error::{Result, UdbError};
use crate::fuzzy;
use crate::metrics::{ProcessMetrics, SysinfoMetrics};

/// How random samples are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplePolicy {
    /// Independent uniform draws; the same record can appear more than once
    #[default]
    WithReplacement,
    /// Every record in the sample is distinct
    Unique,
}

/// Tunables for the query service
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub cutoff: f64,
    pub legacy_cutoff: f64,
    pub sample_policy: SamplePolicy,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            cutoff: fuzzy::DEFAULT_CUTOFF,
            legacy_cutoff: fuzzy::LEGACY_CUTOFF,
            sample_policy: SamplePolicy::default(),
        }
    }
}

/// Aggregate statistics about the catalog and the serving process
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub record_count: usize,
    pub last_refresh: DateTime<Utc>,
    /// Resident memory of this process in MiB, if the platform reports it
    pub memory_mib: Option<f64>,
}

/// Query operations backed by a [`SnapshotStore`]
pub struct QueryService {
    store: Arc<SnapshotStore>,
    settings: QuerySettings,
    metrics: Arc<dyn ProcessMetrics>,
}

impl QueryService {
    pub fn new(store: Arc<SnapshotStore>, settings: QuerySettings) -> Self {
        Self {
            store,
            settings,
            metrics: Arc::new(SysinfoMetrics::new()),
        }
    }

    /// Replace the process metrics source
    pub fn with_metrics(mut self, metrics: Arc<dyn ProcessMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// Record whose title matches exactly (first one wins on duplicates)
    pub fn exact_get(&self, title: &str) -> Result<ApplicationRecord> {
        let snapshot = self.store.current()?;
        snapshot
            .by_title(title)
            .cloned()
            .ok_or_else(|| UdbError::NotFound(title.to_string()))
    }

    /// Ranked fuzzy search over titles
    pub fn search(
        &self,
        query: &str,
        platform: Option<Platform>,
        limit: Option<usize>,
    ) -> Result<Vec<ApplicationRecord>> {
        let snapshot = self.store.current()?;

        let Some(platform) = platform else {
            let names = snapshot.names_ordered_by_length();
            let matches = fuzzy::extract(query, names, self.settings.cutoff, limit);
            return Ok(matches
                .iter()
                .filter_map(|m| snapshot.by_title(m.name).cloned())
                .collect());
        };

        // Titles resolve within the platform's records, so a title shared
        // across platforms never yields a record from the other one.
        let records = snapshot.by_platform(platform);
        let mut by_title: HashMap<&str, &ApplicationRecord> = HashMap::with_capacity(records.len());
        for record in &records {
            by_title.entry(record.title.as_str()).or_insert(*record);
        }

        let names = names_ordered_by_length(records.iter().copied());
        let matches = fuzzy::extract(query, &names, self.settings.cutoff, limit);
        Ok(matches
            .iter()
            .filter_map(|m| by_title.get(m.name).map(|r| (*r).clone()))
            .collect())
    }

    /// Unranked search with the stricter legacy cutoff, results in feed order
    pub fn search_unranked(&self, query: &str) -> Result<Vec<ApplicationRecord>> {
        let snapshot = self.store.current()?;
        let titles: Vec<&str> = snapshot
            .all_records()
            .iter()
            .map(|r| r.title.as_str())
            .collect();

        let matches = fuzzy::extract_iter(query, &titles, self.settings.legacy_cutoff);
        Ok(matches
            .iter()
            .filter_map(|m| snapshot.by_title(m.name).cloned())
            .collect())
    }

    /// `limit` random records using the configured sampling policy
    pub fn random_sample(
        &self,
        limit: usize,
        platform: Option<Platform>,
    ) -> Result<Vec<ApplicationRecord>> {
        self.random_sample_with(limit, platform, &mut rand::thread_rng())
    }

    /// Same as [`random_sample`](Self::random_sample) with a caller-supplied RNG
    pub fn random_sample_with<R: Rng + ?Sized>(
        &self,
        limit: usize,
        platform: Option<Platform>,
        rng: &mut R,
    ) -> Result<Vec<ApplicationRecord>> {
        let snapshot = self.store.current()?;
        let universe = snapshot.universe(platform);

        if limit > universe.len() {
            return Err(UdbError::InvalidArgument("Limit is too high.".to_string()));
        }

        let sample = match self.settings.sample_policy {
            SamplePolicy::WithReplacement => (0..limit)
                .filter_map(|_| universe.choose(rng).map(|r| (*r).clone()))
                .collect(),
            SamplePolicy::Unique => universe
                .choose_multiple(rng, limit)
                .map(|r| (*r).clone())
                .collect(),
        };
        Ok(sample)
    }

    /// Every record, optionally narrowed to one platform
    pub fn list_all(&self, platform: Option<Platform>) -> Result<Vec<ApplicationRecord>> {
        let snapshot = self.store.current()?;
        Ok(snapshot
            .universe(platform)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        let snapshot = self.store.current()?;
        Ok(CatalogStats {
            record_count: snapshot.record_count(),
            last_refresh: snapshot.fetched_at(),
            memory_mib: self.metrics.memory_mib(),
        })
    }
}
