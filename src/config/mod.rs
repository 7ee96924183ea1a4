//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    ResolvedConfig,
};

use crate::state::ValidationRules;

impl ResolvedConfig {
    /// Rule parameters handed to every bound form.
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            min_password_length: self.min_password_length,
        }
    }
}
