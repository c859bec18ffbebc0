//! # beacon-config
//!
//! TOML configuration types, loading, and validation for Beacon.
//!
//! Single source of truth for `BeaconConfig`, account definitions and the
//! shared [`ProviderKind`] enum. Depends only on `beacon-paths`.

mod loading;
mod validation;

pub mod errors;
pub mod types;

// Public API re-exports
pub use errors::ConfigError;
pub use loading::{load_config_file, load_hierarchy, load_hierarchy_from, merge_configs};
pub use types::{
    AccountConfig, BackoffConfig, BeaconConfig, NotificationConfig, PollingConfig, ProviderKind,
    TokenType,
};
pub use validation::validate_config;

impl BeaconConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, ConfigError> {
        loading::load_hierarchy()
    }

    /// Load a single config file, bypassing the hierarchy, then validate it.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = loading::load_config_file(path)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }

    /// Look up a configured account by id.
    pub fn account(&self, id: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.id == id)
    }
}
