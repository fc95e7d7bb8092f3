use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::snapshot::CatalogSnapshot;
use crate::error::{Result, UdbError};

/// Holds the current catalog snapshot
///
/// Single writer (the refresh loop), many readers. Reads are lock-free: a
/// reader gets its own `Arc` to whatever was current and keeps it alive for
/// as long as it needs, even if a newer snapshot is published meanwhile.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: ArcSwapOption<CatalogSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a snapshot as current, replacing the previous one
    pub fn publish(&self, snapshot: impl Into<Arc<CatalogSnapshot>>) -> Arc<CatalogSnapshot> {
        let snapshot = snapshot.into();
        self.current.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// The latest published snapshot
    pub fn current(&self) -> Result<Arc<CatalogSnapshot>> {
        self.current.load_full().ok_or(UdbError::Uninitialized)
    }

    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }
}
