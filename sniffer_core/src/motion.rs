//! Bounded position history and the per-tick motion estimate.
//!
//! Velocity is expressed in meters per tick: the mean of the moving-window
//! smoothed step vectors between consecutive positions.

use std::collections::VecDeque;

use crate::trilateration::Position;

/// Most recent positions kept; the oldest is evicted first.
pub const HISTORY_CAPACITY: usize = 10;
/// Width of the centered moving-average window over step vectors.
pub const SMOOTHING_WINDOW: usize = 5;

/// Displacement between two consecutive positions (meters per tick).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepVector {
    pub dx: f64,
    pub dy: f64,
}

/// `p[i+1] - p[i]` for every consecutive pair.
pub fn step_vectors<'a, I>(positions: I) -> Vec<StepVector>
where
    I: IntoIterator<Item = &'a Position>,
{
    let mut out = Vec::new();
    let mut prev: Option<&Position> = None;
    for p in positions {
        if let Some(q) = prev {
            out.push(StepVector {
                dx: p.x - q.x,
                dy: p.y - q.y,
            });
        }
        prev = Some(p);
    }
    out
}

/// Centered moving average; element `i` averages the window
/// `[max(0, i - w/2), min(len, i + w/2 + 1))`, truncated at both ends.
pub fn smooth_vectors(vectors: &[StepVector], window: usize) -> Vec<StepVector> {
    let half = window / 2;
    (0..vectors.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(vectors.len());
            mean_vector(&vectors[lo..hi]).unwrap_or_default()
        })
        .collect()
}

/// Component-wise mean, `None` for an empty slice.
pub fn mean_vector(vectors: &[StepVector]) -> Option<StepVector> {
    if vectors.is_empty() {
        return None;
    }
    let n = vectors.len() as f64;
    let (sx, sy) = vectors
        .iter()
        .fold((0.0, 0.0), |(sx, sy), v| (sx + v.dx, sy + v.dy));
    Some(StepVector {
        dx: sx / n,
        dy: sy / n,
    })
}

/// FIFO of the last [`HISTORY_CAPACITY`] plausible positions.
#[derive(Debug, Clone)]
pub struct PositionHistory {
    buf: VecDeque<Position>,
    capacity: usize,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Capacity is clamped to at least 2 so a velocity can always form.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry when full.
    pub fn append(&mut self, p: Position) {
        if self.buf.len() == self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(p);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn latest(&self) -> Option<Position> {
        self.buf.back().copied()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.buf.iter()
    }

    pub fn step_vectors(&self) -> Vec<StepVector> {
        step_vectors(self.buf.iter())
    }

    /// Smoothed mean step, or `None` with fewer than two positions.
    pub fn velocity(&self) -> Option<StepVector> {
        let steps = self.step_vectors();
        mean_vector(&smooth_vectors(&steps, SMOOTHING_WINDOW))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(dx: f64, dy: f64) -> StepVector {
        StepVector { dx, dy }
    }

    #[test]
    fn window_is_truncated_at_the_edges() {
        let input = [v(1.0, 0.0), v(2.0, 0.0), v(3.0, 0.0), v(4.0, 0.0)];
        let out = smooth_vectors(&input, 5);
        // i=0: [0,3) -> 2 ; i=1: [0,4) -> 2.5 ; i=2: [0,4) -> 2.5 ; i=3: [1,4) -> 3
        let xs: Vec<f64> = out.iter().map(|s| s.dx).collect();
        assert_eq!(xs, vec![2.0, 2.5, 2.5, 3.0]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let input = [v(1.0, -1.0), v(5.0, 2.0)];
        assert_eq!(smooth_vectors(&input, 1), input.to_vec());
    }

    #[test]
    fn velocity_needs_two_positions() {
        let mut h = PositionHistory::new();
        assert!(h.velocity().is_none());
        h.append(Position::new(-3.0, 0.0));
        assert!(h.velocity().is_none());
        h.append(Position::new(-2.9, 0.1));
        let vel = h.velocity().unwrap();
        assert!((vel.dx - 0.1).abs() < 1e-12);
        assert!((vel.dy - 0.1).abs() < 1e-12);
    }

    #[test]
    fn uniform_motion_keeps_its_step() {
        let mut h = PositionHistory::new();
        for i in 0..8 {
            h.append(Position::new(-4.0 + 0.1 * f64::from(i), 1.0));
        }
        let vel = h.velocity().unwrap();
        assert!((vel.dx - 0.1).abs() < 1e-9);
        assert!(vel.dy.abs() < 1e-12);
    }

    #[test]
    fn capacity_is_never_below_two() {
        assert_eq!(PositionHistory::with_capacity(0).capacity(), 2);
    }
}
