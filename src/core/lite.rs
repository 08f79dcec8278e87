use crate::config::FetchConfig;
use crate::core::orchestrator::FetchOrchestrator;
use crate::domain::ports::{LocationApi, LocationProvider};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::{Arc, OnceLock};

/// Entry point that holds the provider subsystem and fetch settings and hands
/// out a shared [`LocationApi`].
pub struct LocationManagerLite {
    provider: Arc<dyn LocationProvider>,
    config: FetchConfig,
    api: OnceLock<Arc<dyn LocationApi>>,
}

impl LocationManagerLite {
    pub fn new(provider: Arc<dyn LocationProvider>, config: FetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            config,
            api: OnceLock::new(),
        })
    }

    /// 10 s timeout, 60 s maximum cache age, `gps` and `network` providers.
    pub fn with_defaults(provider: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider,
            config: FetchConfig::default(),
            api: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Built on first use; later calls return the same instance.
    pub fn provide(&self) -> Arc<dyn LocationApi> {
        self.api
            .get_or_init(|| {
                tracing::debug!(
                    "Creating location API (timeout {} ms, max age {} ms)",
                    self.config.timeout_millis,
                    self.config.max_age_millis
                );
                let api: Arc<dyn LocationApi> =
                    Arc::new(FetchOrchestrator::new(self.provider.clone(), &self.config));
                api
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLocationProvider;

    #[test]
    fn test_provide_returns_same_instance() {
        let manager =
            LocationManagerLite::with_defaults(Arc::new(InMemoryLocationProvider::new()));

        let first = manager.provide();
        let second = manager.provide();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.config().timeout_millis, 10_000);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = LocationManagerLite::new(
            Arc::new(InMemoryLocationProvider::new()),
            FetchConfig::new(0, 60_000),
        );
        assert!(result.is_err());
    }
}
