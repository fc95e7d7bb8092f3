pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod fuzzy;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod query;
pub mod refresh;
pub mod server;
