mod client;
mod source;

pub use client::{parse_catalog, UpstreamFeed};
pub use source::{CatalogSource, FeedSource, SharedCacheSource};
