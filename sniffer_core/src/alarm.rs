//! Alarm state machine and the repeating tone loop it owns.
//!
//! `SAFE -> WARNING` starts one tone loop; repeated warnings are no-ops.
//! `WARNING -> SAFE` and [`AlarmController::stop`] halt the loop and join it.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel as xch;
use sniffer_traits::{CollisionState, ToneEmitter};

use crate::config::AlarmCfg;

/// Tone emitter shared between the session and each tone loop it spawns.
pub type SharedTone = Arc<Mutex<Box<dyn ToneEmitter + Send>>>;

/// Background thread emitting a tone every `repeat` until stopped.
struct ToneLoop {
    stop_tx: Option<xch::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl ToneLoop {
    fn spawn(tone: SharedTone, cfg: AlarmCfg) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = xch::bounded::<()>(1);
        let tone_len = Duration::from_millis(cfg.tone_ms);
        let repeat = Duration::from_millis(cfg.repeat_ms.max(1));

        let join_handle = std::thread::Builder::new()
            .name("sniffer-tone".into())
            .spawn(move || {
                loop {
                    {
                        let mut t = tone.lock().unwrap_or_else(PoisonError::into_inner);
                        if let Err(e) = t.emit_tone(tone_len) {
                            tracing::warn!(error = %e, "tone emission failed");
                        }
                    }
                    match stop_rx.recv_timeout(repeat) {
                        Err(xch::RecvTimeoutError::Timeout) => {}
                        // Stop request or controller gone.
                        Ok(()) | Err(xch::RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!("tone loop exiting");
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            join_handle: Some(join_handle),
        })
    }
}

impl Drop for ToneLoop {
    fn drop(&mut self) {
        // Dropping the sender wakes the loop out of recv_timeout.
        self.stop_tx.take();
        if let Some(handle) = self.join_handle.take()
            && let Err(e) = handle.join()
        {
            tracing::warn!(?e, "tone loop panicked during shutdown");
        }
    }
}

pub struct AlarmController {
    tone: SharedTone,
    cfg: AlarmCfg,
    state: CollisionState,
    tone_loop: Option<ToneLoop>,
    loops_started: u64,
}

impl AlarmController {
    pub fn new(tone: SharedTone, cfg: AlarmCfg) -> Self {
        Self {
            tone,
            cfg,
            state: CollisionState::Safe,
            tone_loop: None,
            loops_started: 0,
        }
    }

    /// Drive the controller with a gate decision. Returns true when the
    /// state changed.
    pub fn apply(&mut self, decision: CollisionState) -> bool {
        let before = self.state;
        match decision {
            CollisionState::Warning => self.enter_warning(),
            CollisionState::Safe => self.enter_safe(),
        }
        before != self.state
    }

    /// Start the tone loop unless it is already running.
    pub fn enter_warning(&mut self) {
        self.state = CollisionState::Warning;
        if self.tone_loop.is_some() {
            return;
        }
        match ToneLoop::spawn(self.tone.clone(), self.cfg) {
            Ok(l) => {
                self.tone_loop = Some(l);
                self.loops_started += 1;
                tracing::info!("collision warning raised");
            }
            Err(e) => tracing::warn!(error = %e, "cannot spawn tone loop; warning stays silent"),
        }
    }

    /// Halt the tone loop if one is running.
    pub fn enter_safe(&mut self) {
        self.tone_loop.take();
        if self.state.is_warning() {
            tracing::info!("collision warning cleared");
        }
        self.state = CollisionState::Safe;
    }

    /// Force the tone loop off regardless of state (session teardown).
    pub fn stop(&mut self) {
        self.tone_loop.take();
        self.state = CollisionState::Safe;
    }

    pub fn state(&self) -> CollisionState {
        self.state
    }

    pub fn is_sounding(&self) -> bool {
        self.tone_loop.is_some()
    }

    /// Tone loops spawned over the controller's lifetime.
    pub fn tone_loops_started(&self) -> u64 {
        self.loops_started
    }
}

impl Drop for AlarmController {
    fn drop(&mut self) {
        self.stop();
    }
}
