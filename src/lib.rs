pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::InMemoryLocationProvider;
pub use config::{FetchConfig, TomlConfig};
pub use crate::core::{
    lite::LocationManagerLite, orchestrator::FetchOrchestrator, requester::LiveFixRequester,
    selector::CachedFixSelector,
};
pub use domain::model::{Fix, ProviderId};
pub use domain::ports::{
    Clock, LocationApi, LocationProvider, ProviderEvent, SubscriptionHandle, SystemClock,
    UpdateListener,
};
pub use domain::response::Response;
pub use utils::error::{FixError, Result};
