// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exponential approach toward a moving target.
//!
//! Each step closes a fixed fraction of the remaining gap. For a factor in
//! `(0, 1]` the value converges monotonically and never overshoots; a factor
//! of `1` jumps straight to the target and `0` freezes the value.

use kurbo::Point;

/// One smoothing step: `current + (target - current) * factor`.
#[inline]
#[must_use]
pub fn advance(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

/// A scalar eased toward a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedValue {
    current: f64,
    factor: f64,
}

impl SmoothedValue {
    /// Creates a value starting at `initial`.
    #[must_use]
    pub const fn new(initial: f64, factor: f64) -> Self {
        Self {
            current: initial,
            factor,
        }
    }

    /// Moves one step toward `target` and returns the new value.
    pub fn step(&mut self, target: f64) -> f64 {
        self.current = advance(self.current, target, self.factor);
        self.current
    }

    /// Jumps straight to `value`.
    pub fn snap(&mut self, value: f64) {
        self.current = value;
    }

    /// The current value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.current
    }

    /// The smoothing factor.
    #[inline]
    #[must_use]
    pub const fn factor(&self) -> f64 {
        self.factor
    }
}

/// A point eased toward a target, one [`SmoothedValue`] per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedPoint {
    x: SmoothedValue,
    y: SmoothedValue,
}

impl SmoothedPoint {
    /// Creates a smoothed point starting at `initial`.
    #[must_use]
    pub const fn new(initial: Point, factor: f64) -> Self {
        Self {
            x: SmoothedValue::new(initial.x, factor),
            y: SmoothedValue::new(initial.y, factor),
        }
    }

    /// Moves one step toward `target` and returns the new position.
    pub fn step(&mut self, target: Point) -> Point {
        Point::new(self.x.step(target.x), self.y.step(target.y))
    }

    /// Jumps straight to `p`.
    pub fn snap(&mut self, p: Point) {
        self.x.snap(p.x);
        self.y.snap(p.y);
    }

    /// The current position.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Point {
        Point::new(self.x.value(), self.y.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_lies_between_previous_and_target() {
        for factor in [0.01, 0.08, 0.5, 0.99] {
            for (current, target) in [(0.0, 1.0), (1.0, -1.0), (-3.0, -2.5), (2.0, 2.0)] {
                let next = advance(current, target, factor);
                let (lo, hi) = if current <= target {
                    (current, target)
                } else {
                    (target, current)
                };
                assert!(
                    next >= lo && next <= hi,
                    "advance({current}, {target}, {factor}) = {next}"
                );
            }
        }
    }

    #[test]
    fn factor_one_jumps_and_zero_freezes() {
        assert_eq!(advance(0.25, -0.75, 1.0), -0.75);
        assert_eq!(advance(0.25, -0.75, 0.0), 0.25);
    }

    #[test]
    fn converges_without_overshoot() {
        let mut v = SmoothedValue::new(0.0, 0.08);
        let mut prev = v.value();
        for _ in 0..500 {
            let next = v.step(1.0);
            assert!(next >= prev && next <= 1.0);
            prev = next;
        }
        assert!((1.0 - v.value()).abs() < 1e-9);
    }

    #[test]
    fn point_smooths_each_axis() {
        let mut p = SmoothedPoint::new(Point::ZERO, 0.5);
        assert_eq!(p.step(Point::new(1.0, -1.0)), Point::new(0.5, -0.5));
        p.snap(Point::new(3.0, 4.0));
        assert_eq!(p.current(), Point::new(3.0, 4.0));
    }
}
