mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{
    parse_feed_url, CacheConfig, Config, LogFormat, LoggingConfig, RefreshConfig, SearchConfig,
    ServerConfig, SourceKind, UpstreamConfig, CONFIG_KEYS, DEFAULT_UPSTREAM_URL,
};
