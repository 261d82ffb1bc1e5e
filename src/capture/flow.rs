use crate::capture::session::Phase;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;
use tokio::sync::watch::Receiver;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("camera access denied")]
    AccessDenied,
    #[error("no face in the frame yet")]
    NotReady,
    #[error("a face was already captured")]
    AlreadyCaptured(String),
    #[error("liveness has not been confirmed yet")]
    LivenessNotConfirmed,
}

/// The capture capability shared by the plain state machine and its
/// liveness-gated wrapper, so callers pick one by configuration instead of
/// by type.
#[async_trait]
pub trait CaptureFlow: Debug + Send + Sync {
    /// Requests camera access and begins face detection.
    async fn start(&self) -> Result<(), CaptureError>;

    /// Snapshots the current frame into a base64 JPEG data URL.
    async fn capture(&self) -> Result<String, CaptureError>;

    /// Clears any captured payload and restarts detection.
    async fn reset(&self);

    /// Halts polling and releases the camera. Idempotent, valid in any phase.
    async fn stop(&self);

    /// Channel on which phase changes are published for the UI.
    fn phase_notifier(&self) -> Receiver<Phase>;

    fn phase(&self) -> Phase {
        *self.phase_notifier().borrow()
    }
}
