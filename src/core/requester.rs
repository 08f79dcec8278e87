use crate::domain::model::{Fix, ProviderId};
use crate::domain::ports::{LocationProvider, ProviderEvent, SubscriptionHandle, UpdateListener};
use crate::utils::error::{FixError, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Registrations made by one live request.
///
/// Each handle is cancelled exactly once: either by an explicit `release` or
/// when the guard is dropped, which covers the calling future being dropped
/// mid-wait.
struct Subscription<'a, P: LocationProvider + ?Sized> {
    provider: &'a P,
    handles: Vec<(ProviderId, SubscriptionHandle)>,
}

impl<'a, P: LocationProvider + ?Sized> Subscription<'a, P> {
    fn new(provider: &'a P) -> Self {
        Self {
            provider,
            handles: Vec::new(),
        }
    }

    fn register(
        &mut self,
        id: &ProviderId,
        events: &mpsc::UnboundedSender<ProviderEvent>,
    ) -> Result<()> {
        let listener = UpdateListener::new(id.clone(), events.clone());
        let handle = self.provider.request_single_update(id, listener)?;
        tracing::debug!("Registered single-update listener {} on '{}'", handle.id(), id);
        self.handles.push((id.clone(), handle));
        Ok(())
    }

    fn release(&mut self) {
        for (id, handle) in self.handles.drain(..) {
            tracing::debug!("Removing listener {} from '{}'", handle.id(), id);
            self.provider.cancel(handle);
        }
    }
}

impl<P: LocationProvider + ?Sized> Drop for Subscription<'_, P> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Races single-update requests across the enabled providers.
#[derive(Debug, Clone)]
pub struct LiveFixRequester {
    timeout: Duration,
    providers: Vec<ProviderId>,
}

impl LiveFixRequester {
    pub fn new(timeout: Duration, providers: Vec<ProviderId>) -> Self {
        Self { timeout, providers }
    }

    pub fn providers(&self) -> &[ProviderId] {
        &self.providers
    }

    /// Resolves with the first fix delivered by any enabled provider.
    ///
    /// Fails with `NoProvidersEnabled` before registering anything, `Timeout`
    /// once the configured duration has passed since this call started,
    /// `ProviderDisabled` or `ProviderFault` when a racing provider reports
    /// so, and `Cancelled` when `cancel` fires. All registrations are removed
    /// before this returns, or when the future is dropped.
    pub async fn request<P>(&self, provider: &P, cancel: &CancellationToken) -> Result<Fix>
    where
        P: LocationProvider + ?Sized,
    {
        let deadline = Instant::now() + self.timeout;

        let enabled: Vec<&ProviderId> = self
            .providers
            .iter()
            .filter(|id| provider.is_provider_enabled(id))
            .collect();
        if enabled.is_empty() {
            return Err(FixError::NoProvidersEnabled);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subscription = Subscription::new(provider);
        for id in enabled {
            subscription.register(id, &tx)?;
        }
        drop(tx);

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FixError::Cancelled),
            waited = tokio::time::timeout_at(deadline, first_event(&mut rx)) => {
                waited.unwrap_or(Err(FixError::Timeout {
                    millis: self.timeout.as_millis() as u64,
                }))
            }
        };

        subscription.release();
        outcome
    }
}

async fn first_event(events: &mut mpsc::UnboundedReceiver<ProviderEvent>) -> Result<Fix> {
    match events.recv().await {
        Some(ProviderEvent::Fix(fix)) => {
            tracing::debug!(
                "Live fix from '{}' (accuracy {:.1} m)",
                fix.provider,
                fix.accuracy
            );
            Ok(fix)
        }
        Some(ProviderEvent::Disabled(provider)) => Err(FixError::ProviderDisabled { provider }),
        Some(ProviderEvent::Error { provider, message }) => {
            Err(FixError::ProviderFault { provider, message })
        }
        // Every listener was dropped without a notification; only the timer can end the wait.
        None => std::future::pending().await,
    }
}
