use chrono::Utc;
use rollcall::app_config::AppConfig;
use rollcall::capture::{CaptureError, CaptureFlow, CaptureSession, LivenessGate, RandomBlinkProbe};
use rollcall::domain::{Coordinate, LocationSample};
use rollcall::geo::{LocationAuthorizer, LocationProvider, reverse_lookup};
use rollcall::sim::{SimulatedCamera, SimulatedPositionDevice};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪪 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");

    // The demo runs both check-in workflows against the simulated devices: a
    // position fix inside the first configured zone and a camera that
    // produces frames right away.
    let coordinate = config
        .location()
        .zones()
        .first()
        .map(|zone| zone.coordinate)
        .unwrap_or(Coordinate {
            latitude: 51.8615899,
            longitude: 4.3580323,
        });
    let fix = LocationSample::new(coordinate, 12.0, Utc::now().timestamp_millis());

    let device = Arc::new(SimulatedPositionDevice::new(vec![Ok(fix)]));
    let provider = LocationProvider::new(device);
    let authorizer = LocationAuthorizer::new(config.location().zones().to_vec(), config.location().default_radius_m());

    let acquisition = provider.fetch_once(config.location().acquisition()).await;
    let verdict = authorizer.authorize(acquisition);
    info!("🧭 Location verdict: {} (valid: {})", verdict.message, verdict.valid);

    if let Some(sample) = provider.current().await {
        let client = reqwest::Client::new();
        let address = reverse_lookup(&client, config.geocoder().url(), &sample).await;
        info!("🏠 {} ({}, {})", address, sample.position_string(), sample.captured_at_string());
    }

    let camera = Arc::new(SimulatedCamera::with_frames(640, 480));
    let session = CaptureSession::new(camera, config.capture().detect_interval());
    let probe = Arc::new(RandomBlinkProbe::new(config.capture().blink_chance()));
    let gate = LivenessGate::new(session, probe, config.capture().liveness_streak(), config.capture().liveness_interval());

    gate.start().await?;
    info!("📷 Waiting for face detection and a blink...");

    let payload = loop {
        match gate.capture().await {
            Ok(payload) => break payload,
            Err(CaptureError::NotReady) | Err(CaptureError::LivenessNotConfirmed) => {
                sleep(Duration::from_millis(200)).await;
            }
            Err(e) => return Err(e.into()),
        }
    };
    info!("📸 Captured image payload ({} bytes)", payload.len());
    gate.stop().await;

    info!("🔥 {} checked in", env!("CARGO_PKG_NAME"));
    Ok(())
}
