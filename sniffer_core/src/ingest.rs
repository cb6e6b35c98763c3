//! Ingestion loop: transport bytes -> parsed samples -> smoother.
//!
//! The loop blocks in `Transport::read`. Stopping it closes the transport
//! through its closer so the pending read returns and the loop exits. A read
//! failure or end of stream ends the loop for good; no reconnect is tried.
//!
//! Payloads are newline-terminated; a line split across reads is held back
//! until it completes. An unterminated tail is parsed at end of stream and
//! dropped on a read failure.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use sniffer_traits::Transport;
use sniffer_traits::clock::Clock;

use crate::hw_error::map_transport_error;
use crate::smoother::{LineFramer, RangeSmoother, parse_chunk};
use crate::stats::{SessionStats, bump};

/// Clock shared by every loop of a session.
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// How long `Drop` waits for the thread after closing the transport.
const JOIN_GRACE: Duration = Duration::from_millis(500);
const MIN_BUF_BYTES: usize = 16;

pub struct IngestLoop {
    running: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    clock: SharedClock,
    closer: Option<Box<dyn Fn() + Send + Sync>>,
    join_handle: Option<JoinHandle<()>>,
}

impl IngestLoop {
    pub fn spawn<T: Transport + Send + 'static>(
        mut transport: T,
        smoother: Arc<RangeSmoother>,
        read_buf_bytes: usize,
        clock: SharedClock,
        stats: Arc<SessionStats>,
    ) -> std::io::Result<Self> {
        let closer = transport.closer();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let epoch = clock.now();
        let loop_clock = clock.clone();
        let mut buf = vec![0u8; read_buf_bytes.max(MIN_BUF_BYTES)];

        let join_handle = std::thread::Builder::new()
            .name("sniffer-ingest".into())
            .spawn(move || {
                let mut framer = LineFramer::new();
                let apply = |text: &str| {
                    for parsed in parse_chunk(text) {
                        match parsed {
                            Ok(sample) => {
                                if smoother.update(sample) {
                                    bump(&stats.samples_applied);
                                    last_ok_clone.store(loop_clock.ms_since(epoch), Ordering::Relaxed);
                                }
                                tracing::trace!(r1_cm = sample.r1_cm, r2_cm = sample.r2_cm, "sample");
                            }
                            Err(e) => {
                                bump(&stats.samples_malformed);
                                tracing::trace!(error = %e, "malformed payload dropped");
                            }
                        }
                    }
                };
                loop {
                    if shutdown_clone.load(Ordering::Relaxed) {
                        tracing::debug!("ingestion thread received shutdown signal");
                        break;
                    }
                    let result = transport.read(&mut buf);
                    // A reader detached on stop may wake up after a restart;
                    // it must not touch the shared smoother again.
                    if shutdown_clone.load(Ordering::Relaxed) {
                        tracing::debug!("read returned after shutdown; result discarded");
                        break;
                    }
                    match result {
                        Ok(0) => {
                            apply(&framer.finish());
                            tracing::info!("range transport reached end of stream");
                            break;
                        }
                        Ok(n) => apply(&framer.push(&buf[..n])),
                        Err(e) => {
                            let err = map_transport_error(&*e);
                            tracing::warn!(
                                error = %err,
                                dropped_bytes = framer.pending_len(),
                                "range transport failed; ingestion stopped"
                            );
                            break;
                        }
                    }
                }
                running_clone.store(false, Ordering::Relaxed);
                tracing::trace!("ingestion thread exiting cleanly");
            })?;

        Ok(Self {
            running,
            shutdown,
            last_ok,
            epoch,
            clock,
            closer,
            join_handle: Some(join_handle),
        })
    }

    /// False once the transport failed, ended or was closed.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Milliseconds since the last applied sample (or since spawn).
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    pub fn stalled_for_now(&self) -> u64 {
        self.stalled_for(self.clock.ms_since(self.epoch))
    }
}

impl Drop for IngestLoop {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(close) = self.closer.take() {
            close();
        }
        let Some(handle) = self.join_handle.take() else {
            return;
        };
        // Transports without a closer may stay blocked in read; detach those.
        let deadline = Instant::now() + JOIN_GRACE;
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(2));
        }
        if handle.is_finished() {
            if let Err(e) = handle.join() {
                tracing::warn!(?e, "ingestion thread panicked during shutdown");
            }
        } else {
            tracing::warn!("ingestion thread still blocked in read; detaching");
        }
    }
}
