//! Scriptable stand-ins for the browser media and geolocation devices, used
//! by the demo binary and by the test suites. They play the same role the
//! placeholder detection plays in the capture flow: the boundary is real, the
//! signal behind it is simulated.

use crate::capture::{Camera, CaptureError, FrameSource};
use crate::domain::LocationSample;
use crate::geo::{AcquisitionOptions, PositionDevice, PositionError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;

// A one-pixel JPEG, as a quality-0.8 data URL would carry it
const STUB_JPEG_PAYLOAD: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQEAYABgAAD/2wBDAAgGBgcGBQgHBwcJCQgKDBQNDAsLDBkSEw8UHRofHh0aHBwgJC4nICIsIxwcKDcpLDAxNDQ0Hyc5PTgyPC4zNDL/wAALCAABAAEBAREA/8QAFAABAAAAAAAAAAAAAAAAAAAACf/EABQQAQAAAAAAAAAAAAAAAAAAAAD/2gAIAQEAAD8AKp//2Q==";

#[derive(Debug)]
struct SimulatedFrameSource {
    dimensions: StdMutex<(u32, u32)>,
}

impl FrameSource for SimulatedFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        *self.dimensions.lock().unwrap()
    }

    fn snapshot(&self) -> String {
        STUB_JPEG_PAYLOAD.to_string()
    }
}

/// A camera whose frame availability is scripted by the test or demo driving
/// it. Opening it either denies access or yields its single frame source.
#[derive(Debug)]
pub struct SimulatedCamera {
    deny_access: bool,
    source: Arc<SimulatedFrameSource>,
}

impl SimulatedCamera {
    /// A camera that immediately produces frames of the given size.
    pub fn with_frames(width: u32, height: u32) -> Self {
        SimulatedCamera {
            deny_access: false,
            source: Arc::new(SimulatedFrameSource {
                dimensions: StdMutex::new((width, height)),
            }),
        }
    }

    /// A camera that opens fine but produces no frames until told to.
    pub fn without_frames() -> Self {
        Self::with_frames(0, 0)
    }

    /// A camera the user refuses access to.
    pub fn denying_access() -> Self {
        SimulatedCamera {
            deny_access: true,
            ..Self::without_frames()
        }
    }

    pub fn produce_frames(&self, width: u32, height: u32) {
        *self.source.dimensions.lock().unwrap() = (width, height);
    }

    pub fn lose_frames(&self) {
        self.produce_frames(0, 0);
    }
}

#[async_trait]
impl Camera for SimulatedCamera {
    async fn open(&self) -> Result<Arc<dyn FrameSource>, CaptureError> {
        if self.deny_access {
            return Err(CaptureError::AccessDenied);
        }
        Ok(self.source.clone())
    }
}

/// A geolocation device that plays back a script of fixes and errors. Once
/// the script runs out it reports the position as unavailable, pacing itself
/// so a watch loop does not spin.
#[derive(Debug)]
pub struct SimulatedPositionDevice {
    supported: bool,
    fixes: Mutex<VecDeque<Result<LocationSample, PositionError>>>,
}

impl SimulatedPositionDevice {
    pub fn new(fixes: Vec<Result<LocationSample, PositionError>>) -> Self {
        SimulatedPositionDevice {
            supported: true,
            fixes: Mutex::new(fixes.into()),
        }
    }

    /// A platform without any geolocation capability.
    pub fn unsupported() -> Self {
        SimulatedPositionDevice {
            supported: false,
            fixes: Mutex::new(VecDeque::new()),
        }
    }

    async fn next(&self) -> Result<LocationSample, PositionError> {
        match self.fixes.lock().await.pop_front() {
            Some(fix) => fix,
            None => {
                sleep(Duration::from_millis(10)).await;
                Err(PositionError::PositionUnavailable)
            }
        }
    }
}

#[async_trait]
impl PositionDevice for SimulatedPositionDevice {
    fn supported(&self) -> bool {
        self.supported
    }

    async fn current_position(&self, _options: &AcquisitionOptions) -> Result<LocationSample, PositionError> {
        self.next().await
    }

    async fn next_position(&self, _options: &AcquisitionOptions) -> Result<LocationSample, PositionError> {
        self.next().await
    }
}
