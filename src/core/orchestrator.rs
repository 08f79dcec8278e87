use crate::config::FetchConfig;
use crate::core::requester::LiveFixRequester;
use crate::core::selector::CachedFixSelector;
use crate::domain::model::Fix;
use crate::domain::ports::{Clock, LocationApi, LocationProvider, SystemClock};
use crate::domain::response::Response;
use crate::utils::error::{FixError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Serves a fresh cached fix when one exists, otherwise waits for a live one.
pub struct FetchOrchestrator<P: LocationProvider + ?Sized, K: Clock = SystemClock> {
    provider: Arc<P>,
    clock: K,
    selector: CachedFixSelector,
    requester: LiveFixRequester,
}

impl<P: LocationProvider + ?Sized> FetchOrchestrator<P, SystemClock> {
    pub fn new(provider: Arc<P>, config: &FetchConfig) -> Self {
        Self::with_clock(provider, config, SystemClock)
    }
}

impl<P: LocationProvider + ?Sized, K: Clock> FetchOrchestrator<P, K> {
    pub fn with_clock(provider: Arc<P>, config: &FetchConfig, clock: K) -> Self {
        Self {
            provider,
            clock,
            selector: CachedFixSelector::new(config.max_age_millis),
            requester: LiveFixRequester::new(config.timeout(), config.providers.clone()),
        }
    }

    fn cached_fix(&self) -> Result<Option<Fix>> {
        let now = self.clock.now_millis();
        let candidates = self
            .requester
            .providers()
            .iter()
            .map(|id| self.provider.last_known_fix(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.selector.select(candidates, now))
    }

    async fn fetch(&self, cancel: &CancellationToken) -> Result<Fix> {
        if let Some(fix) = self.cached_fix()? {
            tracing::debug!(
                "Using cached fix from '{}' (age {} ms, accuracy {:.1} m)",
                fix.provider,
                fix.age_millis(self.clock.now_millis()),
                fix.accuracy
            );
            return Ok(fix);
        }

        tracing::debug!(
            "No cached fix within {} ms, requesting a live one",
            self.selector.max_age_millis()
        );
        self.requester.request(self.provider.as_ref(), cancel).await
    }

    fn error_response(error: FixError) -> Response<Fix> {
        tracing::warn!("Fix request failed: {}", error);
        Response::error(format!("No fix available: {}", error))
    }
}

#[async_trait]
impl<P, K> LocationApi for FetchOrchestrator<P, K>
where
    P: LocationProvider + ?Sized + 'static,
    K: Clock + 'static,
{
    async fn get_fix(&self) -> Response<Fix> {
        match self.fetch(&CancellationToken::new()).await {
            Ok(fix) => Response::success(fix),
            Err(e) => Self::error_response(e),
        }
    }

    async fn get_fix_until_cancelled(&self, cancel: &CancellationToken) -> Option<Response<Fix>> {
        match self.fetch(cancel).await {
            Ok(fix) => Some(Response::success(fix)),
            Err(FixError::Cancelled) => {
                tracing::debug!("Fix request cancelled by caller");
                None
            }
            Err(e) => Some(Self::error_response(e)),
        }
    }
}
