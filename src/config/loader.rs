//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::state::{
    DEFAULT_DEBOUNCE, DEFAULT_MIN_PASSWORD_LENGTH, DEFAULT_NAVIGATION_DELAY,
    DEFAULT_SUBMIT_FALLBACK,
};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FESTAGRAM_UI_CONFIG";

/// Environment variable overriding the search debounce window (milliseconds).
pub const DEBOUNCE_ENV: &str = "FESTAGRAM_UI_DEBOUNCE_MS";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, built-in defaults are used.
/// Corresponds to `~/.config/festagram-ui/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Quiet period before a search keystroke burst recomputes the query.
    #[serde(default)]
    pub debounce_ms: Option<u64>,

    /// Pause between showing the loading state and navigating.
    #[serde(default)]
    pub navigation_delay_ms: Option<u64>,

    /// Time after which a busy submit control is re-enabled.
    #[serde(default)]
    pub submit_fallback_ms: Option<u64>,

    /// Minimum length for `password` fields.
    #[serde(default)]
    pub min_password_length: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Search debounce window.
    pub debounce: Duration,
    /// Pause between the search recompute and navigation.
    pub navigation_delay: Duration,
    /// Time after which a busy submit control is re-enabled.
    pub submit_fallback: Duration,
    /// Minimum length for `password` fields.
    pub min_password_length: usize,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            navigation_delay: DEFAULT_NAVIGATION_DELAY,
            submit_fallback: DEFAULT_SUBMIT_FALLBACK,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/festagram-ui/festagram-ui.log` on Linux, or the
/// platform state directory elsewhere. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("festagram-ui").join("festagram-ui.log")
    } else {
        PathBuf::from("festagram-ui.log")
    }
}

/// Resolve default config file path.
///
/// Returns `None` if the platform config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("festagram-ui").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (use defaults).
///
/// # Errors
///
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `FESTAGRAM_UI_CONFIG` environment variable
/// 3. Default path `~/.config/festagram-ui/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        debounce: config
            .debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce),
        navigation_delay: config
            .navigation_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.navigation_delay),
        submit_fallback: config
            .submit_fallback_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.submit_fallback),
        min_password_length: config
            .min_password_length
            .unwrap_or(defaults.min_password_length),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides.
///
/// Checks `FESTAGRAM_UI_DEBOUNCE_MS`. Values that are not a whole number of
/// milliseconds are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(DEBOUNCE_ENV) {
        match raw.trim().parse::<u64>() {
            Ok(millis) => config.debounce = Duration::from_millis(millis),
            Err(e) => tracing::warn!(
                var = DEBOUNCE_ENV,
                value = %raw,
                error = %e,
                "ignoring invalid debounce override"
            ),
        }
    }

    config
}

/// Apply CLI argument overrides (highest precedence).
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    debounce_ms: Option<u64>,
    log_file_path: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(millis) = debounce_ms {
        config.debounce = Duration::from_millis(millis);
    }

    if let Some(path) = log_file_path {
        config.log_file_path = path;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
