use crate::domain::model::{Fix, ProviderId};
use crate::domain::response::Response;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Token returned by [`LocationProvider::request_single_update`], used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

impl SubscriptionHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Notification delivered to a single-update listener.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEvent {
    Fix(Fix),
    Disabled(ProviderId),
    Error { provider: ProviderId, message: String },
}

/// Callback side of a single-update registration.
///
/// Sending never blocks, so the provider subsystem may call these from any
/// thread, including while holding its own locks. Notifications arriving after
/// the requesting call has finished are dropped.
#[derive(Debug, Clone)]
pub struct UpdateListener {
    provider: ProviderId,
    events: mpsc::UnboundedSender<ProviderEvent>,
}

impl UpdateListener {
    pub fn new(provider: ProviderId, events: mpsc::UnboundedSender<ProviderEvent>) -> Self {
        Self { provider, events }
    }

    pub fn channel(provider: ProviderId) -> (Self, mpsc::UnboundedReceiver<ProviderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(provider, tx), rx)
    }

    pub fn on_fix(&self, fix: Fix) {
        let _ = self.events.send(ProviderEvent::Fix(fix));
    }

    pub fn on_disabled(&self) {
        let _ = self
            .events
            .send(ProviderEvent::Disabled(self.provider.clone()));
    }

    pub fn on_error(&self, message: impl Into<String>) {
        let _ = self.events.send(ProviderEvent::Error {
            provider: self.provider.clone(),
            message: message.into(),
        });
    }
}

/// The platform's location subsystem.
pub trait LocationProvider: Send + Sync {
    /// Most recent fix the provider has cached, if any. Must not block.
    fn last_known_fix(&self, provider: &ProviderId) -> Result<Option<Fix>>;

    fn is_provider_enabled(&self, provider: &ProviderId) -> bool;

    /// Registers interest in the next fix from `provider`. The listener
    /// receives at most one notification.
    fn request_single_update(
        &self,
        provider: &ProviderId,
        listener: UpdateListener,
    ) -> Result<SubscriptionHandle>;

    /// Removes a registration. Idempotent.
    fn cancel(&self, handle: SubscriptionHandle);
}

/// Caller-facing entry point: one fix per call.
///
/// Callers must hold location authorization; when they do not, the platform
/// rejection comes back as `Response::Error`.
#[async_trait]
pub trait LocationApi: Send + Sync {
    /// Dropping the returned future cancels the request and removes its listeners.
    async fn get_fix(&self) -> Response<Fix>;

    /// Like [`get_fix`](Self::get_fix), but returns `None` if `cancel` fires
    /// before an outcome is reached.
    async fn get_fix_until_cancelled(&self, cancel: &CancellationToken) -> Option<Response<Fix>>;
}

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
