//! In-memory catalog
//!
//! Immutable snapshots of the application catalog and the store that
//! hands the current one out to readers.

mod record;
mod snapshot;
mod store;

pub use record::{ApplicationRecord, Platform};
pub use snapshot::CatalogSnapshot;
pub use store::SnapshotStore;

pub(crate) use snapshot::names_ordered_by_length;
