use crate::domain::AuthorizedZone;
use crate::geo::AcquisitionOptions;
use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    location: Location,
    capture: Capture,
    geocoder: Geocoder,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    pub fn geocoder(&self) -> &Geocoder {
        &self.geocoder
    }
}

#[derive(Debug, Deserialize)]
pub struct Location {
    default_radius_m: f64,
    #[serde(default)]
    zones: Vec<AuthorizedZone>,
    #[serde(default)]
    acquisition: AcquisitionOptions,
}

impl Location {
    pub fn default_radius_m(&self) -> f64 {
        self.default_radius_m
    }

    pub fn zones(&self) -> &[AuthorizedZone] {
        &self.zones
    }

    pub fn acquisition(&self) -> &AcquisitionOptions {
        &self.acquisition
    }
}

#[derive(Debug, Deserialize)]
pub struct Capture {
    #[serde(with = "humantime_serde")]
    detect_interval: Duration,
    #[serde(with = "humantime_serde")]
    liveness_interval: Duration,
    liveness_streak: u32,
    blink_chance: f64,
}

impl Capture {
    pub fn detect_interval(&self) -> Duration {
        self.detect_interval
    }

    pub fn liveness_interval(&self) -> Duration {
        self.liveness_interval
    }

    pub fn liveness_streak(&self) -> u32 {
        self.liveness_streak
    }

    pub fn blink_chance(&self) -> f64 {
        self.blink_chance
    }
}

#[derive(Debug, Deserialize)]
pub struct Geocoder {
    url: String,
}

impl Geocoder {
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        use crate::capture::{DEFAULT_DETECT_INTERVAL, DEFAULT_LIVENESS_INTERVAL, DEFAULT_LIVENESS_STREAK};

        AppConfigBuilder {
            config: AppConfig {
                location: Location {
                    default_radius_m: 100.0,
                    zones: vec![],
                    acquisition: AcquisitionOptions::default(),
                },
                capture: Capture {
                    detect_interval: DEFAULT_DETECT_INTERVAL,
                    liveness_interval: DEFAULT_LIVENESS_INTERVAL,
                    liveness_streak: DEFAULT_LIVENESS_STREAK,
                    blink_chance: 0.05,
                },
                geocoder: Geocoder {
                    url: "https://nominatim.openstreetmap.org".to_string(),
                },
            },
        }
    }

    pub fn geocoder_url(mut self, url: String) -> Self {
        self.config.geocoder.url = url;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
