use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a location source, e.g. `gps` or `network`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub const GPS: &'static str = "gps";
    pub const NETWORK: &'static str = "network";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn gps() -> Self {
        Self::new(Self::GPS)
    }

    pub fn network() -> Self {
        Self::new(Self::NETWORK)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProviderId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// One sampled location reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    /// Horizontal accuracy radius in meters. Lower is better.
    pub accuracy: f32,
    /// Epoch milliseconds at which the sample was taken.
    pub timestamp_millis: i64,
    pub provider: ProviderId,
}

impl Fix {
    pub fn new(
        provider: ProviderId,
        latitude: f64,
        longitude: f64,
        accuracy: f32,
        timestamp_millis: i64,
    ) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            accuracy,
            timestamp_millis,
            provider,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    /// Age relative to `now_millis`. Negative when the fix is stamped in the future.
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.timestamp_millis)
    }

    pub fn is_fresh(&self, now_millis: i64, max_age_millis: u64) -> bool {
        let max_age = i64::try_from(max_age_millis).unwrap_or(i64::MAX);
        self.age_millis(now_millis) <= max_age
    }
}
