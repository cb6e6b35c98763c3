//! Test and helper collaborators for sniffer_core.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use sniffer_traits::{StatusDisplay, StatusReport, ToneEmitter, Transport};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Display that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl StatusDisplay for NullDisplay {
    fn show(&mut self, _report: &StatusReport) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Display that keeps every report; clones share the log.
#[derive(Debug, Default, Clone)]
pub struct RecordingDisplay {
    reports: Arc<Mutex<Vec<StatusReport>>>,
    clears: Arc<AtomicU64>,
}

impl RecordingDisplay {
    pub fn reports(&self) -> Vec<StatusReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clears(&self) -> u64 {
        self.clears.load(Ordering::Relaxed)
    }
}

impl StatusDisplay for RecordingDisplay {
    fn show(&mut self, report: &StatusReport) -> Result<(), BoxError> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*report);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BoxError> {
        self.clears.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Tone emitter that only counts; clones share the count.
#[derive(Debug, Default, Clone)]
pub struct CountingTone {
    count: Arc<AtomicU64>,
}

impl CountingTone {
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl ToneEmitter for CountingTone {
    fn emit_tone(&mut self, _duration: Duration) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Transport whose first read already fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosedTransport;

impl Transport for ClosedTransport {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, BoxError> {
        Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            "transport closed",
        )))
    }
}

/// Transport returning fixed chunks in order, then end of stream.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTransport {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedTransport {
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        let Some(chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }
}

/// Transport repeating one payload every `period` until closed.
#[derive(Debug, Clone)]
pub struct RepeatingTransport {
    payload: Vec<u8>,
    period: Duration,
    closed: Arc<AtomicBool>,
}

impl RepeatingTransport {
    pub fn new(payload: impl AsRef<[u8]>, period: Duration) -> Self {
        Self {
            payload: payload.as_ref().to_vec(),
            period,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Transport for RepeatingTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        std::thread::sleep(self.period);
        if self.closed.load(Ordering::Relaxed) {
            return Err(Box::new(std::io::Error::other("transport closed")));
        }
        let n = self.payload.len().min(buf.len());
        buf[..n].copy_from_slice(&self.payload[..n]);
        Ok(n)
    }

    fn closer(&self) -> Option<Box<dyn Fn() + Send + Sync>> {
        let closed = self.closed.clone();
        Some(Box::new(move || closed.store(true, Ordering::Relaxed)))
    }
}

/// Transport that blocks in `read` until a chunk is fed through the paired
/// sender, like a device read that cannot be interrupted. No closer; the
/// stream ends once every sender is dropped.
#[derive(Debug)]
pub struct GatedTransport {
    chunks: crossbeam_channel::Receiver<Vec<u8>>,
}

impl GatedTransport {
    pub fn new() -> (Self, crossbeam_channel::Sender<Vec<u8>>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { chunks: rx }, tx)
    }
}

impl Transport for GatedTransport {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, BoxError> {
        let Ok(chunk) = self.chunks.recv() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }
}
