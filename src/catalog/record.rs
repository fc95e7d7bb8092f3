use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, UdbError};

/// A single application from the catalog feed
///
/// Only `title` and `systems` are read by the cache. Every other field the
/// feed carries (author, downloads, scripts, screenshots, ...) is kept in
/// `extra` and serialized back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub title: String,
    #[serde(default)]
    pub systems: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplicationRecord {
    /// Create a record with no extra fields
    pub fn new(title: impl Into<String>, systems: &[&str]) -> Self {
        Self {
            title: title.into(),
            systems: systems.iter().map(|s| s.to_string()).collect(),
            extra: Map::new(),
        }
    }

    /// Look up an opaque field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Look up an opaque field holding a string
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.str_field("author")
    }

    pub fn version(&self) -> Option<&str> {
        self.str_field("version")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    /// Categories as strings, skipping anything that isn't one
    pub fn categories(&self) -> Vec<&str> {
        self.field("categories")
            .and_then(Value::as_array)
            .map(|values| values.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether the record lists the given platform (case-insensitive)
    pub fn supports(&self, platform: Platform) -> bool {
        self.systems
            .iter()
            .any(|s| s.eq_ignore_ascii_case(platform.code()))
    }
}

/// Platforms the catalog distinguishes between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    ThreeDs,
    Ds,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::ThreeDs, Platform::Ds];

    /// Code as it appears in a record's `systems` list
    pub fn code(self) -> &'static str {
        match self {
            Self::ThreeDs => "3DS",
            Self::Ds => "DS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Platform {
    type Err = UdbError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                UdbError::InvalidArgument(format!(
                    "Unknown system '{}'. Valid systems: 3DS, DS",
                    s
                ))
            })
    }
}
