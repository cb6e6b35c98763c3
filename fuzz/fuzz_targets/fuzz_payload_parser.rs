#![no_main]
use libfuzzer_sys::fuzz_target;
use sniffer_core::RangeSmoother;
use sniffer_core::smoother::{LineFramer, parse_chunk};

fuzz_target!(|data: &[u8]| {
    let smoother = RangeSmoother::new();
    let mut framer = LineFramer::new();
    // Feed the bytes in two reads split at an input-chosen point.
    let cut = data.first().map_or(0, |&b| usize::from(b) % (data.len() + 1));
    let mut texts = vec![framer.push(&data[..cut]), framer.push(&data[cut..])];
    texts.push(framer.finish());
    for text in &texts {
        for sample in parse_chunk(text).flatten() {
            assert!(!(sample.r1_cm < 0.0) && !(sample.r2_cm < 0.0));
            smoother.update(sample);
        }
    }
    // Dropped samples (markers, NaN) never leak into the smoothed pair.
    let (a, b) = smoother.latest();
    assert!(!a.is_nan() && !b.is_nan());
});
