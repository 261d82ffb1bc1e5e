use crate::domain::LocationSample;
use crate::geo::device::{AcquisitionOptions, PositionDevice, PositionError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, PartialEq)]
pub enum WatchUpdate {
    Position(LocationSample),
    Failed(PositionError),
}

/// Owns the single current position fix and mediates all access to the
/// underlying geolocation device.
#[derive(Debug)]
pub struct LocationProvider {
    device: Arc<dyn PositionDevice>,
    current: Arc<RwLock<Option<LocationSample>>>,
    last_error: Arc<RwLock<Option<PositionError>>>,
}

impl LocationProvider {
    pub fn new(device: Arc<dyn PositionDevice>) -> Self {
        LocationProvider {
            device,
            current: Arc::new(RwLock::new(None)),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// A copy of the most recent fix, if any has been acquired yet.
    pub async fn current(&self) -> Option<LocationSample> {
        self.current.read().await.clone()
    }

    /// The error of the most recent failed acquisition; cleared by a
    /// successful one.
    pub async fn last_error(&self) -> Option<PositionError> {
        self.last_error.read().await.clone()
    }

    /// Requests one position fix and replaces the current sample with it.
    #[instrument(skip_all)]
    pub async fn fetch_once(&self, options: &AcquisitionOptions) -> Result<LocationSample, PositionError> {
        if !self.device.supported() {
            warn!("📍 Geolocation is not supported on this platform");
            *self.last_error.write().await = Some(PositionError::Unsupported);
            return Err(PositionError::Unsupported);
        }

        debug!("📍 Getting current location...");
        match self.device.current_position(options).await {
            Ok(sample) => {
                *self.current.write().await = Some(sample.clone());
                *self.last_error.write().await = None;
                info!("📍 Getting current location... OK ({} accuracy)", sample.accuracy_string());
                Ok(sample)
            }
            Err(e) => {
                warn!("📍 Getting current location... failed, {}", e);
                *self.last_error.write().await = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Begins continuous position updates. Every fix replaces the current
    /// sample and is forwarded on `updates`; device errors are forwarded too
    /// but do not terminate the watch. The watch ends when the handle is
    /// stopped or the receiving side goes away.
    #[instrument(skip_all)]
    pub async fn start_watch(&self, options: &AcquisitionOptions, updates: Sender<WatchUpdate>) -> Result<WatchHandle, PositionError> {
        if !self.device.supported() {
            warn!("📍 Geolocation is not supported on this platform");
            *self.last_error.write().await = Some(PositionError::Unsupported);
            return Err(PositionError::Unsupported);
        }

        let device = self.device.clone();
        let current = self.current.clone();
        let last_error = self.last_error.clone();
        let options = options.clone();
        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_clone = stopped.clone();

        let task = tokio::spawn(async move {
            loop {
                let result = device.next_position(&options).await;

                // A stop strictly supersedes a fix that was already in flight
                if stopped_clone.load(Ordering::SeqCst) {
                    return;
                }

                let update = match result {
                    Ok(sample) => {
                        *current.write().await = Some(sample.clone());
                        *last_error.write().await = None;
                        debug!("📍 Location updated ({} accuracy)", sample.accuracy_string());
                        WatchUpdate::Position(sample)
                    }
                    Err(e) => {
                        warn!("📍 Watch position failed: {}", e);
                        *last_error.write().await = Some(e.clone());
                        WatchUpdate::Failed(e)
                    }
                };

                // An abort only lands at the next await point, so the flag is
                // re-checked right before the update becomes observable
                if stopped_clone.load(Ordering::SeqCst) {
                    return;
                }

                if updates.send(update).await.is_err() {
                    debug!("📍 Watch receiver dropped, ending watch");
                    return;
                }
            }
        });

        info!("📍 Watching position...");
        Ok(WatchHandle { stopped, task })
    }
}

/// Opaque handle to a running watch. Stopping twice, or stopping an already
/// finished watch, is a no-op.
#[derive(Debug)]
pub struct WatchHandle {
    stopped: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            self.task.abort();
            info!("📍 Watching position... stopped");
        }
    }
}
