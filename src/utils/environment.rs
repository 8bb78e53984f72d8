use std::env;
use std::path::PathBuf;

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "REC_ARCHIVE_CONFIG";

/// Configuration file named by `REC_ARCHIVE_CONFIG`, if set and non-empty
pub fn config_path_from_env() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()).map(PathBuf::from)
}

/// `rec-archive/config.toml` under the platform configuration directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("rec-archive").join("config.toml"))
}
