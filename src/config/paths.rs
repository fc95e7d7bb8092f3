use std::fs;
use std::path::PathBuf;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::Result;

/// Manages paths for udb-api configuration and data
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root configuration directory (~/.udb-api)
    pub root: PathBuf,
    /// Configuration file path (~/.udb-api/config.toml)
    pub config_file: PathBuf,
    /// Default shared cache directory (~/.udb-api/cache)
    pub cache_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance using the user's home directory
    pub fn new() -> Result<Self> {
        let home = std::env::var("HOME")?;
        Ok(Self::at(PathBuf::from(home).join(".udb-api")))
    }

    /// Paths rooted at an explicit directory
    pub fn at(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.toml"),
            cache_dir: root.join("cache"),
            root,
        }
    }

    /// Ensure the configuration directory exists with proper permissions
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(&self.root, perms)?;
        }

        Ok(())
    }

    /// Check if the config file exists
    pub fn config_exists(&self) -> bool {
        self.config_file.exists()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self::at(PathBuf::from(".udb-api")))
    }
}
