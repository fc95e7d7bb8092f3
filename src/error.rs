use std::time::Duration;

use thiserror::Error;

/// Result type alias for udb-api operations
pub type Result<T> = std::result::Result<T, UdbError>;

/// Errors that can occur during udb-api operations
#[derive(Error, Debug)]
pub enum UdbError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream feed answered with a non-success HTTP status
    #[error("Upstream feed error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Fetch did not finish within the configured timeout
    #[error("Fetch timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Payload parsed but is not a valid catalog
    #[error("Malformed upstream data: {0}")]
    MalformedUpstream(String),

    /// Shared cache has not been written yet
    #[error("Shared cache entry missing: {0}. Run 'udb-api fetch' first.")]
    CacheMissing(String),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config file: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No catalog has been published yet
    #[error("Catalog is warming up, try again shortly")]
    Uninitialized,

    /// Exact lookup miss
    #[error("Application not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),
}

impl UdbError {
    /// Create an upstream error from HTTP status and message
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Whether this error belongs to the refresh path (fetch, timeout, bad payload)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. }
                | Self::Http(_)
                | Self::Timeout(_)
                | Self::MalformedUpstream(_)
                | Self::CacheMissing(_)
        )
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 2,
            Self::Config(_) | Self::Toml(_) | Self::TomlSerialize(_) | Self::Env(_) => 3,
            Self::NotFound(_) => 4,
            Self::Uninitialized | Self::CacheMissing(_) => 5,
            Self::Upstream { .. } | Self::Http(_) | Self::Timeout(_) | Self::MalformedUpstream(_) => 6,
            Self::Json(_) | Self::Io(_) => 1,
        }
    }
}
