//! Background catalog refresh
//!
//! One cycle is fetch → build snapshot → publish. A failed cycle leaves the
//! previous snapshot in place, gets reported, and the loop carries on at the
//! next tick. Cancellation drops any in-flight fetch, so nothing is published
//! once shutdown has started.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogSnapshot, SnapshotStore};
use crate::error::{Result, UdbError};
use crate::feed::CatalogSource;

/// Default seconds between refresh cycles
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(600);

/// Default bound on a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Sink for failures the refresh task recovers from
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &(dyn StdError + 'static));
}

/// Reports errors as `tracing` error events
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, error: &(dyn StdError + 'static)) {
        tracing::error!(error = %error, "{context}");
    }
}

/// Periodically rebuilds the catalog snapshot from a source
pub struct RefreshLoop<S> {
    source: Arc<S>,
    store: Arc<SnapshotStore>,
    interval: Duration,
    timeout: Duration,
    initial_delay: Duration,
    reporter: Arc<dyn ErrorReporter>,
}

impl<S: CatalogSource + 'static> RefreshLoop<S> {
    pub fn new(source: S, store: Arc<SnapshotStore>) -> Self {
        Self {
            source: Arc::new(source),
            store,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_FETCH_TIMEOUT,
            initial_delay: Duration::ZERO,
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay before the first cycle (zero means refresh right away)
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run a single fetch-build-publish cycle
    pub async fn refresh_once(&self) -> Result<Arc<CatalogSnapshot>> {
        let snapshot = fetch_snapshot(Arc::clone(&self.source), self.timeout).await?;
        Ok(self.publish(snapshot))
    }

    fn publish(&self, snapshot: CatalogSnapshot) -> Arc<CatalogSnapshot> {
        let published = self.store.publish(snapshot);
        tracing::info!(
            records = published.record_count(),
            fetched_at = %published.fetched_at(),
            "Published catalog snapshot"
        );
        published
    }

    /// Refresh on every tick until `cancel` fires
    ///
    /// Each fetch runs in its own task, so a panicking source is reported
    /// and the loop keeps its schedule.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.initial_delay, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            source = %self.source.describe(),
            interval_secs = self.interval.as_secs(),
            "Refresh loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let cycle = tokio::spawn(fetch_snapshot(Arc::clone(&self.source), self.timeout));
            let abort = cycle.abort_handle();

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    abort.abort();
                    tracing::info!("Shutdown requested, abandoning in-flight fetch");
                    break;
                }
                joined = cycle => match joined {
                    Ok(Ok(snapshot)) => {
                        self.publish(snapshot);
                    }
                    Ok(Err(e)) => self.reporter.report("Catalog refresh failed", &e),
                    Err(e) if e.is_panic() => self.reporter.report("Catalog refresh panicked", &e),
                    Err(_) => {}
                }
            }
        }

        tracing::info!("Refresh loop stopped");
    }

    /// Run the loop on the tokio runtime
    pub fn spawn(self, cancel: CancellationToken) -> RefreshHandle {
        let reporter = Arc::clone(&self.reporter);
        RefreshHandle {
            handle: tokio::spawn(self.run(cancel)),
            reporter,
        }
    }
}

async fn fetch_snapshot<S: CatalogSource>(source: Arc<S>, timeout: Duration) -> Result<CatalogSnapshot> {
    tracing::debug!(source = %source.describe(), "Refreshing catalog");
    tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| UdbError::Timeout(timeout))?
}

/// Handle to a spawned refresh loop
pub struct RefreshHandle {
    handle: JoinHandle<()>,
    reporter: Arc<dyn ErrorReporter>,
}

impl RefreshHandle {
    /// Wait for the loop to finish, reporting a panic if there was one
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                self.reporter.report("Refresh task panicked", &e);
            }
        }
    }
}
