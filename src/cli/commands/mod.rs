mod cache;
mod config;
mod fetch;
mod query;
mod serve;

pub use self::cache::cache;
pub use self::config::config;
pub use self::fetch::fetch;
pub use self::query::{get, search};
pub use self::serve::serve;
