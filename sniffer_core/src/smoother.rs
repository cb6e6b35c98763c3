//! Range payload parsing and exponential smoothing of the latest ranges.
//!
//! The smoothed pair is the only state shared between the ingestion loop
//! (writer) and the detection tick (reader). Both fields live behind one
//! lock so a reader never sees r1 from one update and r2 from another.

use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// "No signal" marker; any range at or above it is treated as absent.
pub const NO_SIGNAL_CM: f64 = 60_000.0;
/// Exponential smoothing factor applied to every accepted sample.
pub const EMA_ALPHA: f64 = 0.4;

/// One decoded `r1:<cm>,r2:<cm>` payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSample {
    pub r1_cm: f64,
    pub r2_cm: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseSampleError {
    #[error("expected 2 fields, found {0}")]
    FieldCount(usize),
    #[error("field {index} must look like '{expected}:<number>'")]
    Label { index: usize, expected: &'static str },
    #[error("field {label} is not a number: {text:?}")]
    Number { label: &'static str, text: String },
    #[error("field {0} is negative")]
    Negative(&'static str),
}

impl FromStr for RangeSample {
    type Err = ParseSampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(',').collect();
        if fields.len() != 2 {
            return Err(ParseSampleError::FieldCount(fields.len()));
        }
        let r1_cm = parse_field(fields[0], 0, "r1")?;
        let r2_cm = parse_field(fields[1], 1, "r2")?;
        Ok(Self { r1_cm, r2_cm })
    }
}

fn parse_field(field: &str, index: usize, label: &'static str) -> Result<f64, ParseSampleError> {
    let (_, value) = field
        .split_once(':')
        .filter(|(name, _)| name.trim() == label)
        .ok_or(ParseSampleError::Label {
            index,
            expected: label,
        })?;
    let text = value.trim();
    let v: f64 = text.parse().map_err(|_| ParseSampleError::Number {
        label,
        text: text.to_string(),
    })?;
    if v < 0.0 {
        return Err(ParseSampleError::Negative(label));
    }
    Ok(v)
}

/// Decode every non-empty line of a transport chunk, in order.
pub fn parse_chunk(text: &str) -> impl Iterator<Item = Result<RangeSample, ParseSampleError>> + '_ {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(RangeSample::from_str)
}

/// Longest unterminated tail kept between reads before it is flushed as a
/// (malformed) line.
pub const MAX_PENDING_BYTES: usize = 4096;

/// Reassembles newline-terminated payloads from arbitrary read chunks.
///
/// Bytes after the last `\n` are held until a later chunk completes them, so
/// a payload split by the transport (or a UTF-8 sequence cut in half) is
/// decoded whole.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return the text of every line completed so far.
    /// Empty when no newline arrived yet.
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let complete = match self.pending.iter().rposition(|&b| b == b'\n') {
            Some(last) => {
                let tail = self.pending.split_off(last + 1);
                std::mem::replace(&mut self.pending, tail)
            }
            None if self.pending.len() > MAX_PENDING_BYTES => std::mem::take(&mut self.pending),
            None => return String::new(),
        };
        String::from_utf8_lossy(&complete).into_owned()
    }

    /// Take the unterminated tail at end of stream.
    pub fn finish(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// `alpha * sample + (1 - alpha) * prev`
#[inline]
pub fn ema(prev: f64, sample: f64, alpha: f64) -> f64 {
    sample * alpha + prev * (1.0 - alpha)
}

/// Process-wide smoothed `(r1, r2)` pair, initialised to [`NO_SIGNAL_CM`].
#[derive(Debug)]
pub struct RangeSmoother {
    latest: Mutex<(f64, f64)>,
}

impl Default for RangeSmoother {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeSmoother {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new((NO_SIGNAL_CM, NO_SIGNAL_CM)),
        }
    }

    /// Fold a sample into the smoothed pair. Samples with either component
    /// at or above the no-signal marker (or NaN) are dropped. Returns whether
    /// the sample was applied.
    pub fn update(&self, sample: RangeSample) -> bool {
        if !(sample.r1_cm < NO_SIGNAL_CM && sample.r2_cm < NO_SIGNAL_CM) {
            return false;
        }
        let mut g = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        g.0 = ema(g.0, sample.r1_cm, EMA_ALPHA);
        g.1 = ema(g.1, sample.r2_cm, EMA_ALPHA);
        true
    }

    /// Consistent snapshot of `(r1_cm, r2_cm)`.
    pub fn latest(&self) -> (f64, f64) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True when both ranges are below the no-signal marker.
    pub fn has_signal(&self) -> bool {
        let (r1, r2) = self.latest();
        r1 < NO_SIGNAL_CM && r2 < NO_SIGNAL_CM
    }

    /// Back to "no signal" (session start).
    pub fn reset(&self) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = (NO_SIGNAL_CM, NO_SIGNAL_CM);
    }
}
