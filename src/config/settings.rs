use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use super::paths::Paths;
use crate::error::{Result, UdbError};
use crate::fuzzy;
use crate::query::{QuerySettings, SamplePolicy};

/// Default upstream catalog feed
pub const DEFAULT_UPSTREAM_URL: &str = "https://db.universal-team.net/data/full.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream feed settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Refresh loop settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Search and sampling tunables
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Shared cache location
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log output preferences
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// URL of the JSON catalog feed
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Per-fetch timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Where the refresh loop reads the catalog from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Fetch the upstream feed directly
    #[default]
    Upstream,
    /// Read the shared cache written by `udb-api fetch`
    Shared,
}

/// Refresh loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between refresh cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Catalog source
    #[serde(default)]
    pub source: SourceKind,
}

fn default_interval_secs() -> u64 {
    600
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            source: SourceKind::default(),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Similarity cutoff for ranked search (0-100)
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Similarity cutoff for the legacy search route (0-100)
    #[serde(default = "default_legacy_cutoff")]
    pub legacy_cutoff: f64,
    /// Default number of ranked search results
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Draw random samples without repeats
    #[serde(default)]
    pub unique_samples: bool,
}

fn default_cutoff() -> f64 {
    fuzzy::DEFAULT_CUTOFF
}

fn default_legacy_cutoff() -> f64 {
    fuzzy::LEGACY_CUTOFF
}

fn default_limit() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cutoff: default_cutoff(),
            legacy_cutoff: default_legacy_cutoff(),
            limit: default_limit(),
            unique_samples: false,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Shared cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory (defaults to ~/.udb-api/cache)
    pub dir: Option<PathBuf>,
}

/// Log format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from a specific paths instance
    pub fn load_from(paths: &Paths) -> Result<Self> {
        if !paths.config_exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&paths.config_file)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific paths instance
    pub fn save_to(&self, paths: &Paths) -> Result<()> {
        paths.ensure_dirs()?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(&paths.config_file, &contents)?;
        Ok(())
    }

    /// Validated upstream URL (http or https only)
    pub fn upstream_url(&self) -> Result<Url> {
        parse_feed_url(&self.upstream.url)
    }

    pub fn fetch_timeout(&self) -> Result<Duration> {
        if self.upstream.timeout_secs == 0 {
            return Err(UdbError::Config(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.upstream.timeout_secs))
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        if self.refresh.interval_secs == 0 {
            return Err(UdbError::Config(
                "refresh.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.refresh.interval_secs))
    }

    /// Shared cache directory, falling back to the default under `paths`
    pub fn cache_dir(&self, paths: &Paths) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(|| paths.cache_dir.clone())
    }

    /// Query tunables derived from the `[search]` section
    pub fn query_settings(&self) -> Result<QuerySettings> {
        for (name, value) in [
            ("search.cutoff", self.search.cutoff),
            ("search.legacy_cutoff", self.search.legacy_cutoff),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(UdbError::Config(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }

        Ok(QuerySettings {
            cutoff: self.search.cutoff,
            legacy_cutoff: self.search.legacy_cutoff,
            sample_policy: if self.search.unique_samples {
                SamplePolicy::Unique
            } else {
                SamplePolicy::WithReplacement
            },
        })
    }

    /// Set a value by dotted key, validating it first
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "upstream.url" => {
                parse_feed_url(value)?;
                self.upstream.url = value.to_string();
            }
            "upstream.timeout_secs" => self.upstream.timeout_secs = parse_seconds(key, value)?,
            "refresh.interval_secs" => self.refresh.interval_secs = parse_seconds(key, value)?,
            "refresh.source" => {
                self.refresh.source = match value {
                    "upstream" => SourceKind::Upstream,
                    "shared" => SourceKind::Shared,
                    _ => {
                        return Err(UdbError::InvalidArgument(
                            "refresh.source must be 'upstream' or 'shared'".to_string(),
                        ))
                    }
                }
            }
            "search.cutoff" => self.search.cutoff = parse_number(key, value)?,
            "search.legacy_cutoff" => self.search.legacy_cutoff = parse_number(key, value)?,
            "search.limit" => self.search.limit = parse_number(key, value)?,
            "search.unique_samples" => self.search.unique_samples = parse_number(key, value)?,
            "server.bind" => self.server.bind = value.to_string(),
            "cache.dir" => self.cache.dir = Some(PathBuf::from(value)),
            "logging.format" => {
                self.logging.format = match value {
                    "pretty" => LogFormat::Pretty,
                    "json" => LogFormat::Json,
                    _ => {
                        return Err(UdbError::InvalidArgument(
                            "logging.format must be 'pretty' or 'json'".to_string(),
                        ))
                    }
                }
            }
            _ => {
                return Err(UdbError::InvalidArgument(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

/// Keys accepted by [`Config::set_value`]
pub const CONFIG_KEYS: &[&str] = &[
    "upstream.url",
    "upstream.timeout_secs",
    "refresh.interval_secs",
    "refresh.source",
    "search.cutoff",
    "search.legacy_cutoff",
    "search.limit",
    "search.unique_samples",
    "server.bind",
    "cache.dir",
    "logging.format",
];

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| UdbError::InvalidArgument(format!("Invalid value for {key}: '{value}'")))
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    match parse_number(key, value)? {
        0 => Err(UdbError::InvalidArgument(format!(
            "{key} must be greater than zero"
        ))),
        secs => Ok(secs),
    }
}

/// Parse a feed URL, allowing only http and https
pub fn parse_feed_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|_| UdbError::InvalidArgument(format!("Invalid feed URL: {}", raw)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        _ => Err(UdbError::InvalidArgument(format!(
            "Feed URL must be http(s) with a host: {}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Create a test Paths instance using a temp directory
    fn make_test_paths(temp_dir: &TempDir) -> Paths {
        Paths::at(temp_dir.path().to_path_buf())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Default Value Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.upstream.url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.refresh.interval_secs, 600);
        assert_eq!(config.refresh.source, SourceKind::Upstream);
        assert_eq!(config.search.cutoff, 50.0);
        assert_eq!(config.search.legacy_cutoff, 70.0);
        assert_eq!(config.search.limit, 5);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.cache.dir.is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load/Save Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_returns_default_when_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = make_test_paths(&temp_dir);

        let config = Config::load_from(&paths).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8000");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = make_test_paths(&temp_dir);

        let mut config = Config::default();
        config.refresh.source = SourceKind::Shared;
        config.search.cutoff = 65.0;
        config.cache.dir = Some(PathBuf::from("/var/cache/udb"));

        config.save_to(&paths).unwrap();

        let loaded = Config::load_from(&paths).unwrap();
        assert_eq!(loaded.refresh.source, SourceKind::Shared);
        assert_eq!(loaded.search.cutoff, 65.0);
        assert_eq!(loaded.cache.dir, Some(PathBuf::from("/var/cache/udb")));
    }

    #[test]
    fn test_load_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = make_test_paths(&temp_dir);

        fs::create_dir_all(&paths.root).unwrap();
        fs::write(
            &paths.config_file,
            r#"
[refresh]
interval_secs = 60
source = "shared"
"#,
        )
        .unwrap();

        let config = Config::load_from(&paths).unwrap();
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.refresh.source, SourceKind::Shared);
        assert_eq!(config.upstream.url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.search.limit, 5);
    }

    #[test]
    fn test_load_empty_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = make_test_paths(&temp_dir);

        fs::create_dir_all(&paths.root).unwrap();
        fs::write(&paths.config_file, "").unwrap();

        let config = Config::load_from(&paths).unwrap();
        assert_eq!(config.refresh.interval_secs, 600);
    }

    #[test]
    fn test_load_rejects_unknown_source() {
        let temp_dir = TempDir::new().unwrap();
        let paths = make_test_paths(&temp_dir);

        fs::create_dir_all(&paths.root).unwrap();
        fs::write(&paths.config_file, "[refresh]\nsource = \"redis\"\n").unwrap();

        assert!(matches!(Config::load_from(&paths), Err(UdbError::Toml(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derived Value Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_cache_dir_falls_back_to_paths() {
        let paths = Paths::at(PathBuf::from("/home/u/.udb-api"));
        let mut config = Config::default();
        assert_eq!(config.cache_dir(&paths), PathBuf::from("/home/u/.udb-api/cache"));

        config.cache.dir = Some(PathBuf::from("/srv/udb"));
        assert_eq!(config.cache_dir(&paths), PathBuf::from("/srv/udb"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = Config::default();
        config.refresh.interval_secs = 0;
        assert!(matches!(config.refresh_interval(), Err(UdbError::Config(_))));
    }

    #[test]
    fn test_zero_fetch_timeout_is_rejected() {
        let mut config = Config::default();
        assert_eq!(config.fetch_timeout().unwrap(), Duration::from_secs(30));

        config.upstream.timeout_secs = 0;
        assert!(matches!(config.fetch_timeout(), Err(UdbError::Config(_))));
    }

    #[test]
    fn test_set_value_rejects_zero_seconds() {
        let mut config = Config::default();
        for key in ["upstream.timeout_secs", "refresh.interval_secs"] {
            let err = config.set_value(key, "0").unwrap_err();
            assert!(matches!(err, UdbError::InvalidArgument(_)), "{key}");
        }
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.refresh.interval_secs, 600);
    }

    #[test]
    fn test_query_settings_follow_search_section() {
        let mut config = Config::default();
        config.search.unique_samples = true;
        config.search.cutoff = 60.0;

        let settings = config.query_settings().unwrap();
        assert_eq!(settings.cutoff, 60.0);
        assert_eq!(settings.sample_policy, SamplePolicy::Unique);
    }

    #[test]
    fn test_query_settings_reject_out_of_range_cutoff() {
        let mut config = Config::default();
        config.search.cutoff = 150.0;
        assert!(matches!(config.query_settings(), Err(UdbError::Config(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // set_value Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_value_parses_numbers_and_enums() {
        let mut config = Config::default();
        config.set_value("refresh.interval_secs", "120").unwrap();
        config.set_value("refresh.source", "shared").unwrap();
        config.set_value("search.unique_samples", "true").unwrap();
        config.set_value("logging.format", "json").unwrap();

        assert_eq!(config.refresh.interval_secs, 120);
        assert_eq!(config.refresh.source, SourceKind::Shared);
        assert!(config.search.unique_samples);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("refresh.interval_secs", "soon").is_err());
        assert!(config.set_value("upstream.url", "ftp://example.com/full.json").is_err());
        let err = config.set_value("api.token", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_parse_feed_url() {
        assert!(parse_feed_url(DEFAULT_UPSTREAM_URL).is_ok());
        assert!(parse_feed_url("not a url").is_err());
        assert!(parse_feed_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_config_serializes_to_toml() {
        let mut config = Config::default();
        config.refresh.source = SourceKind::Shared;

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("source = \"shared\""));
        assert!(toml_str.contains("interval_secs = 600"));
    }
}
