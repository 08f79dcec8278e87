use crate::domain::model::{Fix, ProviderId};
use crate::domain::ports::{LocationProvider, SubscriptionHandle, UpdateListener};
use crate::utils::error::{FixError, Result};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct ProviderState {
    enabled: bool,
    last_known: Option<Fix>,
}

#[derive(Debug)]
struct Registration {
    provider: ProviderId,
    // None once notified or abandoned.
    listener: Option<UpdateListener>,
}

#[derive(Debug)]
struct State {
    providers: HashMap<ProviderId, ProviderState>,
    registrations: HashMap<u64, Registration>,
    next_handle: u64,
    authorized: bool,
    total_registrations: usize,
    cancel_calls: usize,
}

/// Location subsystem kept entirely in memory.
///
/// Fixes, provider state changes and faults are pushed in by the owner and
/// delivered to whichever single-update listeners are pending at that moment.
/// Every registration and cancel call is counted so callers can check that
/// listeners were cleaned up.
#[derive(Debug)]
pub struct InMemoryLocationProvider {
    state: Mutex<State>,
}

impl Default for InMemoryLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLocationProvider {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                providers: HashMap::new(),
                registrations: HashMap::new(),
                next_handle: 1,
                authorized: true,
                total_registrations: 0,
                cancel_calls: 0,
            }),
        }
    }

    /// `gps` and `network`, both enabled, with nothing cached.
    pub fn with_default_providers() -> Self {
        let provider = Self::new();
        provider.add_provider(ProviderId::gps(), true);
        provider.add_provider(ProviderId::network(), true);
        provider
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_provider(&self, id: ProviderId, enabled: bool) {
        self.lock().providers.entry(id).or_default().enabled = enabled;
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.lock().authorized = authorized;
    }

    pub fn set_last_known(&self, fix: Fix) {
        let id = fix.provider.clone();
        self.lock().providers.entry(id).or_default().last_known = Some(fix);
    }

    /// Enables or disables a provider. Disabling notifies its pending listeners.
    pub fn set_enabled(&self, id: &ProviderId, enabled: bool) {
        let pending = {
            let mut state = self.lock();
            let entry = state.providers.entry(id.clone()).or_default();
            let was_enabled = entry.enabled;
            entry.enabled = enabled;
            if was_enabled && !enabled {
                take_pending(&mut state, id)
            } else {
                Vec::new()
            }
        };

        for listener in pending {
            listener.on_disabled();
        }
    }

    /// Records `fix` as its provider's last known fix and hands it to that
    /// provider's pending listeners.
    pub fn publish_fix(&self, fix: Fix) {
        let pending = {
            let mut state = self.lock();
            state
                .providers
                .entry(fix.provider.clone())
                .or_default()
                .last_known = Some(fix.clone());
            take_pending(&mut state, &fix.provider)
        };

        for listener in pending {
            listener.on_fix(fix.clone());
        }
    }

    pub fn fail(&self, id: &ProviderId, message: &str) {
        let pending = take_pending(&mut self.lock(), id);
        for listener in pending {
            listener.on_error(message);
        }
    }

    /// Forgets every pending listener without notifying it. Registrations stay
    /// active until cancelled.
    pub fn drop_listeners(&self) {
        for registration in self.lock().registrations.values_mut() {
            registration.listener = None;
        }
    }

    pub fn registrations(&self) -> usize {
        self.lock().total_registrations
    }

    /// Number of `cancel` calls, repeated calls included.
    pub fn cancellations(&self) -> usize {
        self.lock().cancel_calls
    }

    pub fn active_subscriptions(&self) -> usize {
        self.lock().registrations.len()
    }

    pub fn active_subscriptions_for(&self, id: &ProviderId) -> usize {
        self.lock()
            .registrations
            .values()
            .filter(|r| &r.provider == id)
            .count()
    }
}

fn take_pending(state: &mut State, id: &ProviderId) -> Vec<UpdateListener> {
    state
        .registrations
        .values_mut()
        .filter(|r| &r.provider == id)
        .filter_map(|r| r.listener.take())
        .collect()
}

fn authorization_missing() -> FixError {
    FixError::AuthorizationMissing {
        message: "neither fine nor coarse location access is granted".to_string(),
    }
}

impl LocationProvider for InMemoryLocationProvider {
    fn last_known_fix(&self, provider: &ProviderId) -> Result<Option<Fix>> {
        let state = self.lock();
        if !state.authorized {
            return Err(authorization_missing());
        }
        Ok(state
            .providers
            .get(provider)
            .and_then(|p| p.last_known.clone()))
    }

    fn is_provider_enabled(&self, provider: &ProviderId) -> bool {
        self.lock()
            .providers
            .get(provider)
            .is_some_and(|p| p.enabled)
    }

    fn request_single_update(
        &self,
        provider: &ProviderId,
        listener: UpdateListener,
    ) -> Result<SubscriptionHandle> {
        let mut state = self.lock();
        if !state.authorized {
            return Err(authorization_missing());
        }
        if !state.providers.contains_key(provider) {
            return Err(FixError::ProviderFault {
                provider: provider.clone(),
                message: "unknown provider".to_string(),
            });
        }

        let id = state.next_handle;
        state.next_handle += 1;
        state.total_registrations += 1;
        state.registrations.insert(
            id,
            Registration {
                provider: provider.clone(),
                listener: Some(listener),
            },
        );
        Ok(SubscriptionHandle::new(id))
    }

    fn cancel(&self, handle: SubscriptionHandle) {
        let mut state = self.lock();
        state.cancel_calls += 1;
        state.registrations.remove(&handle.id());
    }
}
