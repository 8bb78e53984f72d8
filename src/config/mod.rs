//! Service configuration
//!
//! Settings are read from a TOML file. Every key is optional; missing keys fall back to
//! the reference deployment values:
//!
//! ```toml
//! save_path = "live"            # archive root
//! timezone = "+08:00"           # wall-clock offset of file names and query bounds
//! cache_capacity = 100          # segment descriptors kept in memory
//! cache_ttl_secs = 43200        # 12 hours
//! slow_file_secs = 10           # warn when one file takes longer than this
//! sort_by_capture_time = false  # otherwise results follow archive walk order
//! ```
//!
//! The file is located by [`Config::load`]: an explicit path, then the
//! `REC_ARCHIVE_CONFIG` environment variable, then `rec-archive/config.toml` in the
//! platform configuration directory.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timestamps::parse_utc_offset;
use crate::utils::{config_path_from_env, default_config_path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub save_path: PathBuf,
    pub timezone: String,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
    pub slow_file_secs: u64,
    pub sort_by_capture_time: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("live"),
            timezone: "+08:00".to_string(),
            cache_capacity: 100,
            cache_ttl_secs: 12 * 60 * 60,
            slow_file_secs: 10,
            sort_by_capture_time: false,
        }
    }
}

impl Config {
    /// Resolve and load the configuration
    ///
    /// An explicit path or `REC_ARCHIVE_CONFIG` must point at a readable file. The
    /// platform default is optional; without it the built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = config_path_from_env() {
            return Self::from_file(&path);
        }
        if let Some(path) = default_config_path().filter(|p| p.is_file()) {
            return Self::from_file(&path);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the cache capacity or TTL is zero, the timezone is not a
    /// `±HH:MM` offset, or `save_path` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.save_path.as_os_str().is_empty() {
            bail!("save_path must not be empty");
        }
        if self.cache_capacity == 0 {
            bail!("cache_capacity must be at least 1");
        }
        if self.cache_ttl_secs == 0 {
            bail!("cache_ttl_secs must be at least 1");
        }
        self.zone()?;
        Ok(())
    }

    pub fn zone(&self) -> Result<FixedOffset> {
        parse_utc_offset(&self.timezone).context("Invalid timezone setting")
    }

    pub fn cache_capacity(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.cache_capacity).context("cache_capacity must be at least 1")
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn slow_file_threshold(&self) -> Duration {
        Duration::from_secs(self.slow_file_secs)
    }
}
