use crate::capture::camera::{Camera, FrameSource};
use crate::capture::flow::{CaptureError, CaptureFlow};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch::{Receiver, Sender, channel};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_DETECT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Idle,
    Detecting,
    Ready,
    Captured,
}

#[derive(Debug)]
struct SessionState {
    phase: Phase,
    payload: Option<String>,
    source: Option<Arc<dyn FrameSource>>,
    // Bumped by start/reset/stop; a detection tick that observes a different
    // generation than the one it was spawned with must not act
    generation: u64,
}

/// Drives a single capture session: `Idle → Detecting → Ready → Captured`,
/// with `reset` as the only way back. Detection is a fixed-interval poll that
/// promotes to `Ready` once the frame source reports non-zero dimensions and
/// demotes again when the frames go away.
#[derive(Debug)]
pub struct CaptureSession {
    camera: Arc<dyn Camera>,
    detect_interval: Duration,
    state: Arc<Mutex<SessionState>>,
    notifier_tx: Sender<Phase>,
    notifier_rx: Receiver<Phase>,
}

impl CaptureSession {
    pub fn new(camera: Arc<dyn Camera>, detect_interval: Duration) -> Self {
        let (notifier_tx, notifier_rx) = channel(Phase::Idle);

        CaptureSession {
            camera,
            detect_interval,
            state: Arc::new(Mutex::new(SessionState {
                phase: Phase::Idle,
                payload: None,
                source: None,
                generation: 0,
            })),
            notifier_tx,
            notifier_rx,
        }
    }

    fn spawn_detection_loop(&self, generation: u64) {
        let state = self.state.clone();
        let notifier_tx = self.notifier_tx.clone();
        let interval = self.detect_interval;

        tokio::spawn(async move {
            loop {
                sleep(interval).await;

                let mut guard = state.lock().await;
                if guard.generation != generation || guard.phase == Phase::Captured {
                    return;
                }

                let frame_ready = guard.source.as_ref().is_some_and(|source| {
                    let (width, height) = source.dimensions();
                    width > 0 && height > 0
                });

                let phase = if frame_ready { Phase::Ready } else { Phase::Detecting };
                if guard.phase != phase {
                    match phase {
                        Phase::Ready => debug!("📷 Face detected"),
                        _ => debug!("📷 Looking for face..."),
                    }
                    set_phase(&mut guard, &notifier_tx, phase);
                }
            }
        });
    }
}

fn set_phase(state: &mut SessionState, notifier_tx: &Sender<Phase>, phase: Phase) {
    if state.phase != phase {
        state.phase = phase;
        notifier_tx.send_replace(phase);
    }
}

#[async_trait]
impl CaptureFlow for CaptureSession {
    #[instrument(skip(self))]
    async fn start(&self) -> Result<(), CaptureError> {
        debug!("📷 Starting camera...");
        let source = self
            .camera
            .open()
            .await
            .inspect_err(|e| warn!("📷 Starting camera... failed, {}", e))?;

        let generation = {
            let mut state = self.state.lock().await;
            state.source = Some(source);
            state.payload = None;
            state.generation += 1;
            set_phase(&mut state, &self.notifier_tx, Phase::Detecting);
            state.generation
        };

        info!("📷 Starting camera... OK");
        self.spawn_detection_loop(generation);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn capture(&self) -> Result<String, CaptureError> {
        let mut state = self.state.lock().await;
        match state.phase {
            Phase::Ready => {
                let source = state.source.as_ref().ok_or(CaptureError::NotReady)?;
                let payload = source.snapshot();
                state.payload = Some(payload.clone());
                set_phase(&mut state, &self.notifier_tx, Phase::Captured);
                info!("📸 Face captured ({} bytes)", payload.len());
                Ok(payload)
            }
            Phase::Captured => {
                debug!("📸 Capture requested again, returning the existing payload");
                Err(CaptureError::AlreadyCaptured(state.payload.clone().unwrap_or_default()))
            }
            _ => {
                debug!("📷 Capture requested before a face was in the frame");
                Err(CaptureError::NotReady)
            }
        }
    }

    #[instrument(skip(self))]
    async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.payload = None;
        state.generation += 1;

        if state.source.is_some() {
            set_phase(&mut state, &self.notifier_tx, Phase::Detecting);
            let generation = state.generation;
            drop(state);
            self.spawn_detection_loop(generation);
        } else {
            set_phase(&mut state, &self.notifier_tx, Phase::Idle);
        }
        debug!("📷 Session reset");
    }

    #[instrument(skip(self))]
    async fn stop(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.source = None; // Releases the camera
        state.payload = None;
        set_phase(&mut state, &self.notifier_tx, Phase::Idle);
        debug!("📷 Camera stopped");
    }

    fn phase_notifier(&self) -> Receiver<Phase> {
        self.notifier_rx.clone()
    }
}
