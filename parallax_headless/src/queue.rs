// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use parallax_core::host::FrameScheduler;
use parallax_core::time::{Duration, HostTime};

/// Identifies one request made to a [`FrameQueue`]. Ids start at 1 and are
/// never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(pub u32);

/// A frame scheduler that fires only on demand.
///
/// Every scheduled and cancelled id is kept in order, so tests can assert on
/// the exact handles the controller used. Firing a frame advances the
/// simulated clock by the frame interval.
#[derive(Clone, Debug)]
pub struct FrameQueue {
    next_id: u32,
    outstanding: Vec<FrameId>,
    scheduled: Vec<FrameId>,
    cancelled: Vec<FrameId>,
    now: HostTime,
    interval: Duration,
}

impl FrameQueue {
    /// A 60 Hz queue starting at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_interval(Duration(16_667))
    }

    /// A queue whose clock advances by `interval` per fired frame.
    #[must_use]
    pub const fn with_interval(interval: Duration) -> Self {
        Self {
            next_id: 0,
            outstanding: Vec::new(),
            scheduled: Vec::new(),
            cancelled: Vec::new(),
            now: HostTime::ZERO,
            interval,
        }
    }

    /// Removes the oldest outstanding request, advances the clock and
    /// returns the request with the time to deliver.
    pub fn fire_next(&mut self) -> Option<(FrameId, HostTime)> {
        if self.outstanding.is_empty() {
            return None;
        }
        let id = self.outstanding.remove(0);
        self.now = self.now + self.interval;
        Some((id, self.now))
    }

    /// Moves the clock forward without firing anything.
    pub fn advance_clock(&mut self, by: Duration) {
        self.now = self.now + by;
    }

    /// Requests scheduled and not yet fired or cancelled.
    #[must_use]
    pub fn outstanding(&self) -> &[FrameId] {
        &self.outstanding
    }

    /// Every id ever scheduled, in order.
    #[must_use]
    pub fn scheduled(&self) -> &[FrameId] {
        &self.scheduled
    }

    /// Every id passed to `cancel_frame`, in order.
    #[must_use]
    pub fn cancelled(&self) -> &[FrameId] {
        &self.cancelled
    }

    /// The most recently scheduled id.
    #[must_use]
    pub fn last_scheduled(&self) -> Option<FrameId> {
        self.scheduled.last().copied()
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for FrameQueue {
    type Handle = FrameId;

    fn schedule_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.outstanding.push(id);
        self.scheduled.push(id);
        id
    }

    fn cancel_frame(&mut self, handle: FrameId) {
        self.cancelled.push(handle);
        self.outstanding.retain(|&id| id != handle);
    }

    fn now(&self) -> HostTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_request_order_and_advances_clock() {
        let mut q = FrameQueue::with_interval(Duration(10));
        let a = q.schedule_frame();
        let b = q.schedule_frame();
        assert_eq!(q.fire_next(), Some((a, HostTime(10))));
        assert_eq!(q.fire_next(), Some((b, HostTime(20))));
        assert_eq!(q.fire_next(), None);
        assert_eq!(q.now(), HostTime(20));
    }

    #[test]
    fn cancelled_requests_never_fire() {
        let mut q = FrameQueue::new();
        let a = q.schedule_frame();
        q.cancel_frame(a);
        assert!(q.outstanding().is_empty());
        assert_eq!(q.cancelled(), &[a]);
        assert_eq!(q.fire_next(), None);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut q = FrameQueue::new();
        let a = q.schedule_frame();
        q.cancel_frame(a);
        let b = q.schedule_frame();
        assert_ne!(a, b);
        assert_eq!(q.last_scheduled(), Some(b));
    }
}
