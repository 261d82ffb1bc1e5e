use crate::capture::flow::CaptureError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Boundary to the media-capture device.
#[async_trait]
pub trait Camera: Debug + Send + Sync {
    /// Requests access to the camera. Denial surfaces as
    /// [`CaptureError::AccessDenied`]; the user may simply retry.
    async fn open(&self) -> Result<Arc<dyn FrameSource>, CaptureError>;
}

/// A live video feed. Frames become available some time after the camera is
/// opened; until then the reported dimensions are zero.
pub trait FrameSource: Debug + Send + Sync {
    /// Width and height of the current frame, zero while no frame is produced.
    fn dimensions(&self) -> (u32, u32);

    /// Encodes the current frame as a base64 JPEG data URL at quality 0.8,
    /// the exact format the hidden-field handoff expects.
    fn snapshot(&self) -> String;
}
