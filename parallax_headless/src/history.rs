// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use parallax_core::time::Duration;

/// Rolling history of frame deltas with a fixed capacity.
#[derive(Debug)]
pub struct DeltaHistory<const N: usize> {
    deltas_ms: [f64; N],
    cursor: usize,
    total_frames: u64,
}

impl<const N: usize> Default for DeltaHistory<N> {
    fn default() -> Self {
        Self::new(16.67)
    }
}

impl<const N: usize> DeltaHistory<N> {
    /// Creates a history with `seed_delta_ms` prefilled in the ring buffer.
    #[must_use]
    pub const fn new(seed_delta_ms: f64) -> Self {
        Self {
            deltas_ms: [seed_delta_ms; N],
            cursor: 0,
            total_frames: 0,
        }
    }

    /// Records one frame delta.
    pub fn push(&mut self, delta: Duration) {
        if N == 0 {
            return;
        }
        self.total_frames = self.total_frames.saturating_add(1);
        self.deltas_ms[self.cursor] = delta.as_millis_f64();
        self.cursor = (self.cursor + 1) % N;
    }

    /// Frames recorded so far.
    #[must_use]
    pub const fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Returns ring-buffer frame deltas oldest→newest.
    #[must_use]
    pub fn frame_deltas(&self) -> [f64; N] {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.deltas_ms[(self.cursor + i) % N];
        }
        out
    }

    /// Mean of the buffered deltas in milliseconds.
    #[must_use]
    pub fn mean_ms(&self) -> f64 {
        if N == 0 {
            return 0.0;
        }
        self.deltas_ms.iter().sum::<f64>() / N as f64
    }

    /// Returns an ASCII sparkline over `frame_deltas()`.
    #[must_use]
    pub fn sparkline_ascii(&self, min_ms: f64, max_ms: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let span = (max_ms - min_ms).max(f64::EPSILON);
        self.frame_deltas()
            .iter()
            .map(|&v| {
                let t = (v.clamp(min_ms, max_ms) - min_ms) / span;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "index is clamped to ASCII level count"
                )]
                let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
                char::from(LEVELS[level.min(LEVELS.len() - 1)])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_come_back_oldest_first() {
        let mut h = DeltaHistory::<3>::new(0.0);
        for ms in [10, 20, 30, 40] {
            h.push(Duration::from_millis(ms));
        }
        assert_eq!(h.frame_deltas(), [20.0, 30.0, 40.0]);
        assert_eq!(h.total_frames(), 4);
        assert_eq!(h.mean_ms(), 30.0);
    }

    #[test]
    fn sparkline_spans_the_levels() {
        let mut h = DeltaHistory::<2>::new(0.0);
        h.push(Duration::from_millis(0));
        h.push(Duration::from_millis(100));
        assert_eq!(h.sparkline_ascii(0.0, 100.0), " @");
    }
}
