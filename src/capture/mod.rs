mod camera;
mod flow;
mod liveness;
mod session;

pub use camera::{Camera, FrameSource};
pub use flow::{CaptureError, CaptureFlow};
pub use liveness::{DEFAULT_LIVENESS_INTERVAL, DEFAULT_LIVENESS_STREAK, LivenessGate, LivenessProbe, RandomBlinkProbe};
pub use session::{CaptureSession, DEFAULT_DETECT_INTERVAL, Phase};
