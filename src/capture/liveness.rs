use crate::capture::flow::{CaptureError, CaptureFlow};
use crate::capture::session::Phase;
use async_trait::async_trait;
use rand::Rng;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::watch::Receiver;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

pub const DEFAULT_LIVENESS_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_LIVENESS_STREAK: u32 = 3;

/// One boolean liveness signal per poll. The gate only cares about runs of
/// consecutive positives, so a real vision backend can replace the stand-in
/// probe without touching the gate.
pub trait LivenessProbe: Debug + Send + Sync {
    fn sample(&self) -> bool;
}

/// Stand-in blink detector: a blink is "seen" on a small random fraction of
/// samples. Deliberately not smarter than the placeholder it preserves.
#[derive(Debug)]
pub struct RandomBlinkProbe {
    chance: f64,
}

impl RandomBlinkProbe {
    pub fn new(chance: f64) -> Self {
        RandomBlinkProbe { chance }
    }
}

impl Default for RandomBlinkProbe {
    fn default() -> Self {
        RandomBlinkProbe { chance: 0.05 }
    }
}

impl LivenessProbe for RandomBlinkProbe {
    fn sample(&self) -> bool {
        rand::rng().random_bool(self.chance)
    }
}

#[derive(Debug)]
struct GateState {
    confirmed: bool,
    streak: u32,
    generation: u64,
}

/// Wraps a capture flow with an anti-spoofing precondition: `capture` is
/// rejected until the probe has produced a configured run of consecutive
/// positive samples.
#[derive(Debug)]
pub struct LivenessGate<F: CaptureFlow> {
    inner: F,
    probe: Arc<dyn LivenessProbe>,
    streak_to_confirm: u32,
    interval: Duration,
    state: Arc<Mutex<GateState>>,
}

impl<F: CaptureFlow> LivenessGate<F> {
    pub fn new(inner: F, probe: Arc<dyn LivenessProbe>, streak_to_confirm: u32, interval: Duration) -> Self {
        LivenessGate {
            inner,
            probe,
            streak_to_confirm,
            interval,
            state: Arc::new(Mutex::new(GateState {
                confirmed: false,
                streak: 0,
                generation: 0,
            })),
        }
    }

    pub async fn liveness_confirmed(&self) -> bool {
        self.state.lock().await.confirmed
    }

    fn spawn_probe_loop(&self, generation: u64) {
        let state = self.state.clone();
        let probe = self.probe.clone();
        let streak_to_confirm = self.streak_to_confirm;
        let interval = self.interval;

        tokio::spawn(async move {
            loop {
                sleep(interval).await;

                let mut guard = state.lock().await;
                if guard.generation != generation || guard.confirmed {
                    return;
                }

                if probe.sample() {
                    guard.streak += 1;
                    if guard.streak >= streak_to_confirm {
                        guard.confirmed = true;
                        info!("👁️ Blink detected, liveness confirmed");
                        return;
                    }
                } else {
                    guard.streak = 0;
                }
            }
        });
    }
}

#[async_trait]
impl<F: CaptureFlow> CaptureFlow for LivenessGate<F> {
    #[instrument(skip(self))]
    async fn start(&self) -> Result<(), CaptureError> {
        self.inner.start().await?;

        let generation = {
            let mut state = self.state.lock().await;
            state.confirmed = false;
            state.streak = 0;
            state.generation += 1;
            state.generation
        };

        debug!("👁️ Waiting for a blink...");
        self.spawn_probe_loop(generation);
        Ok(())
    }

    async fn capture(&self) -> Result<String, CaptureError> {
        if !self.liveness_confirmed().await {
            debug!("👁️ Capture requested before liveness was confirmed");
            return Err(CaptureError::LivenessNotConfirmed);
        }

        self.inner.capture().await
    }

    #[instrument(skip(self))]
    async fn reset(&self) {
        let generation = {
            let mut state = self.state.lock().await;
            state.confirmed = false;
            state.streak = 0;
            state.generation += 1;
            state.generation
        };

        self.inner.reset().await;
        debug!("👁️ Waiting for a blink...");
        self.spawn_probe_loop(generation);
    }

    #[instrument(skip(self))]
    async fn stop(&self) {
        {
            let mut state = self.state.lock().await;
            state.generation += 1;
        }
        self.inner.stop().await;
    }

    fn phase_notifier(&self) -> Receiver<Phase> {
        self.inner.phase_notifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::session::CaptureSession;
    use crate::sim::SimulatedCamera;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_log::test;

    const TICK: Duration = Duration::from_millis(10);

    /// Plays back a fixed script of probe samples, then keeps answering false.
    #[derive(Debug)]
    struct ScriptedProbe {
        script: Vec<bool>,
        cursor: AtomicUsize,
    }

    impl ScriptedProbe {
        fn new(script: Vec<bool>) -> Self {
            ScriptedProbe {
                script,
                cursor: AtomicUsize::new(0),
            }
        }
    }

    impl LivenessProbe for ScriptedProbe {
        fn sample(&self) -> bool {
            let at = self.cursor.fetch_add(1, Ordering::SeqCst);
            self.script.get(at).copied().unwrap_or(false)
        }
    }

    fn gate_with(probe: ScriptedProbe) -> LivenessGate<CaptureSession> {
        let camera = Arc::new(SimulatedCamera::with_frames(640, 480));
        let session = CaptureSession::new(camera, TICK);
        LivenessGate::new(session, Arc::new(probe), DEFAULT_LIVENESS_STREAK, TICK)
    }

    async fn settle() {
        sleep(TICK * 8).await;
    }

    #[test(tokio::test)]
    async fn capture_is_rejected_until_three_consecutive_positive_samples() {
        let gate = gate_with(ScriptedProbe::new(vec![false; 64]));
        gate.start().await.unwrap();
        settle().await;

        assert_eq!(gate.phase(), Phase::Ready, "the face is detected, only liveness is missing");
        assert_eq!(gate.capture().await, Err(CaptureError::LivenessNotConfirmed));
    }

    #[test(tokio::test)]
    async fn a_run_of_three_positives_confirms_liveness() {
        let gate = gate_with(ScriptedProbe::new(vec![true, true, true]));
        gate.start().await.unwrap();
        settle().await;

        assert!(gate.liveness_confirmed().await);
        let payload = gate.capture().await.unwrap();
        assert!(payload.starts_with("data:image/jpeg;base64,"));
        assert_eq!(gate.phase(), Phase::Captured);
    }

    #[test(tokio::test)]
    async fn a_negative_sample_resets_the_streak() {
        // Never three in a row
        let gate = gate_with(ScriptedProbe::new(vec![true, true, false, true, true, false, true, true]));
        gate.start().await.unwrap();
        settle().await;
        settle().await;

        assert!(!gate.liveness_confirmed().await);
        assert_eq!(gate.capture().await, Err(CaptureError::LivenessNotConfirmed));
    }

    #[test(tokio::test)]
    async fn reset_clears_the_confirmation_and_polls_the_probe_again() {
        let gate = gate_with(ScriptedProbe::new(vec![true, true, true, /* after reset: */ true, true, true]));
        gate.start().await.unwrap();
        settle().await;
        gate.capture().await.unwrap();

        gate.reset().await;
        assert!(!gate.liveness_confirmed().await);
        assert_eq!(gate.capture().await, Err(CaptureError::LivenessNotConfirmed));

        settle().await;
        assert!(gate.liveness_confirmed().await, "the restarted loop confirmed again");
        gate.capture().await.unwrap();
    }

    #[test(tokio::test)]
    async fn stop_cancels_a_probe_loop_that_was_about_to_confirm() {
        let gate = gate_with(ScriptedProbe::new(vec![true; 64]));
        gate.start().await.unwrap();
        gate.stop().await;
        settle().await;

        assert!(!gate.liveness_confirmed().await);
        assert_eq!(gate.phase(), Phase::Idle);
    }

    #[test]
    fn the_random_probe_honors_the_extremes() {
        let never = RandomBlinkProbe::new(0.0);
        let always = RandomBlinkProbe::new(1.0);

        for _ in 0..100 {
            assert!(!never.sample());
            assert!(always.sample());
        }
    }
}
