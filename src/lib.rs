//! Client-side check-in workflows for an attendance application: a
//! liveness-gated face capture state machine and a geofenced location
//! validation flow. The camera, the geolocation device and the liveness
//! signal are boundary traits; the bundled `sim` module provides the
//! scriptable stand-ins the demo binary and the tests run against.

pub mod app_config;
pub mod capture;
pub mod domain;
pub mod geo;
pub mod sim;
