// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the render loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`RenderLoopController`](crate::controller::RenderLoopController) calls as
//! it runs. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! [`FrameSummaryBuilder`] collects phase timestamps during a tick and
//! produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).

use crate::controller::LoopStatus;
use crate::scene::SceneState;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a tick is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Reading the pointer target and smoothing it.
    Input,
    /// Advancing the scene state.
    Advance,
    /// Drawing the scene.
    Draw,
}

/// What triggered a [`LoopStatus`] transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusCause {
    /// An explicit `start()` or `stop()`.
    Explicit,
    /// The page became hidden or visible.
    Visibility,
    /// The centerpiece was torn down.
    Teardown,
}

/// Whether a frame callback was requested or withdrawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameRequestKind {
    /// A callback was scheduled.
    Scheduled,
    /// A pending callback was cancelled.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a scheduled frame callback fires.
#[derive(Clone, Copy, Debug)]
pub struct FrameTickEvent {
    /// Monotonic tick counter.
    pub frame_index: u64,
    /// Timestamp handed to the callback.
    pub now: HostTime,
    /// Time since the previous tick, if there was one in this run.
    pub delta: Option<Duration>,
}

/// Marks the beginning of a tick phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a tick phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Tick counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted when a frame callback is scheduled or cancelled.
#[derive(Clone, Copy, Debug)]
pub struct FrameRequestEvent {
    /// Index the requested tick will carry.
    pub frame_index: u64,
    /// Scheduled or cancelled.
    pub kind: FrameRequestKind,
    /// Host time of the request.
    pub at: HostTime,
}

/// Emitted on every [`LoopStatus`] transition.
#[derive(Clone, Copy, Debug)]
pub struct StatusChangeEvent {
    /// Previous status.
    pub from: LoopStatus,
    /// New status.
    pub to: LoopStatus,
    /// What triggered the transition.
    pub cause: StatusCause,
    /// Host time of the transition.
    pub at: HostTime,
}

/// Emitted when the viewport changes.
#[derive(Clone, Copy, Debug)]
pub struct ResizeEvent {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
    /// Device pixel ratio.
    pub pixel_ratio: f64,
    /// Aspect ratio handed to the camera.
    pub aspect: f64,
    /// Host time of the resize.
    pub at: HostTime,
}

/// Per-tick summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Tick counter.
    pub frame_index: u64,
    /// Timestamp handed to the callback.
    pub now: HostTime,
    /// Time since the previous tick, if known.
    pub delta: Option<Duration>,
    /// Input phase duration in µs (0 if not measured).
    pub input_us: u64,
    /// Advance phase duration in µs (0 if not measured).
    pub advance_us: u64,
    /// Draw phase duration in µs (0 if not measured).
    pub draw_us: u64,
    /// Scene rotations after the tick.
    pub state: SceneState,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the render loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame callback fires.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called at the beginning of a tick phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a tick phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called when a frame callback is scheduled or cancelled.
    fn on_frame_request(&mut self, e: &FrameRequestEvent) {
        _ = e;
    }

    /// Called on every loop status transition.
    fn on_status_change(&mut self, e: &StatusChangeEvent) {
        _ = e;
    }

    /// Called when the viewport changes.
    fn on_resize(&mut self, e: &ResizeEvent) {
        _ = e;
    }

    /// Called with a per-tick summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($(#[$doc:meta] $name:ident => $method:ident($ty:ty);)*) => {
        $(
            #[$doc]
            #[inline]
            pub fn $name(&mut self, e: &$ty) {
                #[cfg(feature = "trace")]
                if let Some(s) = &mut self.sink {
                    s.$method(e);
                }
                #[cfg(not(feature = "trace"))]
                {
                    _ = e;
                }
            }
        )*
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    dispatch! {
        /// Emits a [`FrameTickEvent`].
        frame_tick => on_frame_tick(FrameTickEvent);
        /// Emits a [`PhaseBeginEvent`].
        phase_begin => on_phase_begin(PhaseBeginEvent);
        /// Emits a [`PhaseEndEvent`].
        phase_end => on_phase_end(PhaseEndEvent);
        /// Emits a [`FrameRequestEvent`].
        frame_request => on_frame_request(FrameRequestEvent);
        /// Emits a [`StatusChangeEvent`].
        status_change => on_status_change(StatusChangeEvent);
        /// Emits a [`ResizeEvent`].
        resize => on_resize(ResizeEvent);
        /// Emits a [`FrameSummary`].
        frame_summary => on_frame_summary(FrameSummary);
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a tick and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: FrameTickEvent,
    phase_starts: [Option<HostTime>; 3],
    phase_ends: [Option<HostTime>; 3],
    state: SceneState,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            tick: *tick,
            phase_starts: [None; 3],
            phase_ends: [None; 3],
            state: SceneState::default(),
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Records the scene rotations after advancing.
    pub fn set_state(&mut self, state: SceneState) {
        self.state = state;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            now: self.tick.now,
            delta: self.tick.delta,
            input_us: self.phase_duration(PhaseKind::Input),
            advance_us: self.phase_duration(PhaseKind::Advance),
            draw_us: self.phase_duration(PhaseKind::Draw),
            state: self.state,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> u64 {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start).micros(),
            _ => 0,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Input => 0,
        PhaseKind::Advance => 1,
        PhaseKind::Draw => 2,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Angles;

    fn sample_tick() -> FrameTickEvent {
        FrameTickEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            delta: Some(Duration(16_667)),
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_frame_tick(&sample_tick());
        sink.on_status_change(&StatusChangeEvent {
            from: LoopStatus::Stopped,
            to: LoopStatus::Running,
            cause: StatusCause::Explicit,
            at: HostTime(0),
        });
        sink.on_frame_summary(&FrameSummaryBuilder::new(&sample_tick()).finish());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.frame_tick(&sample_tick());
        tracer.frame_request(&FrameRequestEvent {
            frame_index: 0,
            kind: FrameRequestKind::Scheduled,
            at: HostTime(0),
        });
    }

    #[test]
    fn summary_builder_computes_durations() {
        let mut builder = FrameSummaryBuilder::new(&sample_tick());

        builder.phase_begin(PhaseKind::Input, HostTime(1_000_000));
        builder.phase_end(PhaseKind::Input, HostTime(1_000_020));
        builder.phase_begin(PhaseKind::Advance, HostTime(1_000_020));
        builder.phase_end(PhaseKind::Advance, HostTime(1_000_070));
        builder.phase_begin(PhaseKind::Draw, HostTime(1_000_070));
        builder.phase_end(PhaseKind::Draw, HostTime(1_001_570));
        builder.set_state(SceneState {
            mesh_rotation: Angles::new(0.1, 0.2),
            group_rotation: Angles::ZERO,
        });

        let summary = builder.finish();
        assert_eq!(summary.input_us, 20);
        assert_eq!(summary.advance_us, 50);
        assert_eq!(summary.draw_us, 1500);
        assert_eq!(summary.frame_index, 42);
        assert_eq!(summary.delta, Some(Duration(16_667)));
        assert_eq!(summary.state.mesh_rotation, Angles::new(0.1, 0.2));
    }

    #[test]
    fn summary_builder_missing_phases_are_zero() {
        let summary = FrameSummaryBuilder::new(&sample_tick()).finish();
        assert_eq!(summary.input_us, 0);
        assert_eq!(summary.advance_us, 0);
        assert_eq!(summary.draw_us, 0);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct StatusLog {
            transitions: Vec<(LoopStatus, LoopStatus)>,
        }
        impl TraceSink for StatusLog {
            fn on_status_change(&mut self, e: &StatusChangeEvent) {
                self.transitions.push((e.from, e.to));
            }
        }

        let mut sink = StatusLog {
            transitions: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.status_change(&StatusChangeEvent {
            from: LoopStatus::Running,
            to: LoopStatus::Stopped,
            cause: StatusCause::Visibility,
            at: HostTime(5),
        });
        drop(tracer);
        assert_eq!(sink.transitions, &[(LoopStatus::Running, LoopStatus::Stopped)]);
    }
}
