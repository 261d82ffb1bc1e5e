use crate::domain::LocationSample;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// How a position fix should be acquired. Callers may override any of these;
/// the defaults are high accuracy, a 10 second timeout and a cached fix of at
/// most 5 minutes old.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AcquisitionOptions {
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_maximum_age")]
    pub maximum_age: Duration,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        AcquisitionOptions {
            high_accuracy: default_high_accuracy(),
            timeout: default_timeout(),
            maximum_age: default_maximum_age(),
        }
    }
}

fn default_high_accuracy() -> bool {
    true
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_maximum_age() -> Duration {
    Duration::from_secs(300)
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("geolocation is not supported on this platform")]
    Unsupported,
    #[error("location access denied by user")]
    PermissionDenied,
    #[error("location information unavailable")]
    PositionUnavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("location error: {0}")]
    Unknown(String),
}

/// Boundary to the platform geolocation device. Timeouts are enforced by the
/// device itself; implementations signal one through [`PositionError::Timeout`]
/// rather than having callers race their own timer.
#[async_trait]
pub trait PositionDevice: Debug + Send + Sync {
    /// Whether the platform exposes a geolocation capability at all.
    fn supported(&self) -> bool;

    /// Requests a single position fix.
    async fn current_position(&self, options: &AcquisitionOptions) -> Result<LocationSample, PositionError>;

    /// Resolves once the device produces its next fix. Driven in a loop by the
    /// provider's watch.
    async fn next_position(&self, options: &AcquisitionOptions) -> Result<LocationSample, PositionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquisition_options_default_to_the_browser_defaults() {
        let options = AcquisitionOptions::default();

        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(300));
    }

    #[test]
    fn deserializes_acquisition_options_with_humantime_durations() {
        let options: AcquisitionOptions =
            serde_json::from_str(r#"{ "high_accuracy": false, "timeout": "3s", "maximum_age": "1m" }"#).unwrap();

        assert!(!options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }
}
