// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic frame timestamps.
//!
//! [`HostTime`] is a point on the host's monotonic clock in whole
//! microseconds. Browsers hand frame callbacks a `DOMHighResTimeStamp` in
//! fractional milliseconds; [`HostTime::from_millis_f64`] converts those
//! without ever panicking on odd inputs.
//!
//! Timestamps only annotate trace events and frame deltas. Scene motion is
//! tick-based, so nothing in the animation depends on their precision.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time in microseconds on the host's monotonic clock.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostTime(pub u64);

impl HostTime {
    /// The clock origin.
    pub const ZERO: Self = Self(0);

    /// Returns the raw microsecond value.
    #[inline]
    #[must_use]
    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Converts a fractional millisecond timestamp to a [`HostTime`].
    ///
    /// Negative and NaN inputs map to [`HostTime::ZERO`]; values too large
    /// for `u64` saturate.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "`as` saturates float-to-int casts and maps NaN to zero"
    )]
    pub fn from_millis_f64(ms: f64) -> Self {
        Self((ms * 1000.0) as u64)
    }

    /// Returns the time in fractional milliseconds.
    #[inline]
    #[must_use]
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}µs)", self.0)
    }
}

/// A span of time in microseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1000))
    }

    /// Returns the raw microsecond value.
    #[inline]
    #[must_use]
    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Returns the duration in fractional milliseconds.
    #[inline]
    #[must_use]
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}µs)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_millis_f64_converts_fractional_timestamps() {
        assert_eq!(HostTime::from_millis_f64(16.667), HostTime(16_667));
        assert_eq!(HostTime::from_millis_f64(0.0), HostTime::ZERO);
    }

    #[test]
    fn from_millis_f64_never_panics_on_odd_input() {
        assert_eq!(HostTime::from_millis_f64(-5.0), HostTime::ZERO);
        assert_eq!(HostTime::from_millis_f64(f64::NAN), HostTime::ZERO);
        assert_eq!(HostTime::from_millis_f64(f64::INFINITY), HostTime(u64::MAX));
    }

    #[test]
    fn host_time_duration_ops() {
        let t = HostTime(1000);
        let d = Duration(200);
        assert_eq!((t + d).micros(), 1200);
        assert_eq!(HostTime(1200) - t, d);
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(t.saturating_duration_since(HostTime(400)), Duration(600));
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
    }

    #[test]
    fn duration_from_millis() {
        assert_eq!(Duration::from_millis(16), Duration(16_000));
        assert_eq!(Duration(16_500).as_millis_f64(), 16.5);
    }
}
