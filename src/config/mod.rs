#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::ProviderId;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogSettings};
pub use toml_config::{LoggingConfig, TomlConfig};

pub const DEFAULT_TIMEOUT_MILLIS: u64 = 10_000;
pub const DEFAULT_MAX_AGE_MILLIS: u64 = 60_000;

/// Timing and provider settings fixed for the lifetime of one fetcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound on the live request, measured from its start. Must be positive.
    pub timeout_millis: u64,
    /// Oldest cached fix still worth returning.
    pub max_age_millis: u64,
    /// Providers consulted for cached fixes and raced for live ones, in order.
    pub providers: Vec<ProviderId>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            max_age_millis: DEFAULT_MAX_AGE_MILLIS,
            providers: vec![ProviderId::gps(), ProviderId::network()],
        }
    }
}

impl FetchConfig {
    pub fn new(timeout_millis: u64, max_age_millis: u64) -> Self {
        Self {
            timeout_millis,
            max_age_millis,
            ..Self::default()
        }
    }

    pub fn with_providers<I, P>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProviderId>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

impl Validate for FetchConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("timeout_millis", self.timeout_millis, 1)?;
        validation::validate_non_empty_list("providers", &self.providers)?;
        for provider in &self.providers {
            validation::validate_non_empty_string("providers", provider.as_str())?;
        }
        validation::validate_unique("providers", &self.providers)?;
        Ok(())
    }
}
