//! Alarm tone emitters.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use sniffer_traits::ToneEmitter;

use crate::error::HwError;

/// Rings the terminal bell on stderr. The duration is advisory; terminals
/// decide how long a bell lasts.
#[derive(Debug, Default)]
pub struct TerminalBell;

impl ToneEmitter for TerminalBell {
    fn emit_tone(&mut self, duration: Duration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut err = std::io::stderr().lock();
        err.write_all(b"\x07")
            .and_then(|()| err.flush())
            .map_err(|e| Box::new(HwError::Io(e)) as Box<dyn std::error::Error + Send + Sync>)?;
        tracing::debug!(duration_ms = duration.as_millis() as u64, "alarm tone");
        Ok(())
    }
}

/// Emitter that only counts tones; used with `--mute` and in tests.
#[derive(Debug, Default, Clone)]
pub struct SilentTone {
    emitted: Arc<AtomicU64>,
}

impl SilentTone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tones requested so far (shared across clones).
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }
}

impl ToneEmitter for SilentTone {
    fn emit_tone(&mut self, duration: Duration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(duration_ms = duration.as_millis() as u64, "alarm tone (silent)");
        Ok(())
    }
}
