// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use parallax_core::controller::LoopStatus;
use parallax_core::scene::{Angles, SceneState};
use parallax_core::time::{Duration, HostTime};
use parallax_core::trace::{
    FrameRequestEvent, FrameRequestKind, FrameSummary, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, ResizeEvent, StatusCause, StatusChangeEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_FRAME_REQUEST: u8 = 4;
const TAG_STATUS_CHANGE: u8 = 5;
const TAG_RESIZE: u8 = 6;
const TAG_FRAME_SUMMARY: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Input => 0,
            PhaseKind::Advance => 1,
            PhaseKind::Draw => 2,
        });
    }

    fn write_status(&mut self, s: LoopStatus) {
        self.write_u8(match s {
            LoopStatus::Stopped => 0,
            LoopStatus::Running => 1,
        });
    }

    fn write_angles(&mut self, a: Angles) {
        self.write_f64(a.x);
        self.write_f64(a.y);
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.micros());
        self.write_option_u64(e.delta.map(Duration::micros));
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.micros());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.micros());
    }

    fn on_frame_request(&mut self, e: &FrameRequestEvent) {
        self.write_u8(TAG_FRAME_REQUEST);
        self.write_u64(e.frame_index);
        self.write_u8(match e.kind {
            FrameRequestKind::Scheduled => 0,
            FrameRequestKind::Cancelled => 1,
        });
        self.write_u64(e.at.micros());
    }

    fn on_status_change(&mut self, e: &StatusChangeEvent) {
        self.write_u8(TAG_STATUS_CHANGE);
        self.write_status(e.from);
        self.write_status(e.to);
        self.write_u8(match e.cause {
            StatusCause::Explicit => 0,
            StatusCause::Visibility => 1,
            StatusCause::Teardown => 2,
        });
        self.write_u64(e.at.micros());
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.write_u8(TAG_RESIZE);
        self.write_f64(e.width);
        self.write_f64(e.height);
        self.write_f64(e.pixel_ratio);
        self.write_f64(e.aspect);
        self.write_u64(e.at.micros());
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.micros());
        self.write_option_u64(s.delta.map(Duration::micros));
        self.write_u64(s.input_us);
        self.write_u64(s.advance_us);
        self.write_u64(s.draw_us);
        self.write_angles(s.state.mesh_rotation);
        self.write_angles(s.state.group_rotation);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`FrameRequestEvent`].
    FrameRequest(FrameRequestEvent),
    /// A [`StatusChangeEvent`].
    StatusChange(StatusChangeEvent),
    /// A [`ResizeEvent`].
    Resize(ResizeEvent),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Input,
            1 => PhaseKind::Advance,
            _ => PhaseKind::Draw,
        })
    }

    fn read_status(&mut self) -> Option<LoopStatus> {
        Some(match self.read_u8()? {
            0 => LoopStatus::Stopped,
            _ => LoopStatus::Running,
        })
    }

    fn read_angles(&mut self) -> Option<Angles> {
        Some(Angles::new(self.read_f64()?, self.read_f64()?))
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            now: self.read_time()?,
            delta: self.read_option_u64()?.map(Duration),
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_frame_request(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameRequest(FrameRequestEvent {
            frame_index: self.read_u64()?,
            kind: match self.read_u8()? {
                0 => FrameRequestKind::Scheduled,
                _ => FrameRequestKind::Cancelled,
            },
            at: self.read_time()?,
        }))
    }

    fn decode_status_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::StatusChange(StatusChangeEvent {
            from: self.read_status()?,
            to: self.read_status()?,
            cause: match self.read_u8()? {
                0 => StatusCause::Explicit,
                1 => StatusCause::Visibility,
                _ => StatusCause::Teardown,
            },
            at: self.read_time()?,
        }))
    }

    fn decode_resize(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Resize(ResizeEvent {
            width: self.read_f64()?,
            height: self.read_f64()?,
            pixel_ratio: self.read_f64()?,
            aspect: self.read_f64()?,
            at: self.read_time()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: self.read_time()?,
            delta: self.read_option_u64()?.map(Duration),
            input_us: self.read_u64()?,
            advance_us: self.read_u64()?,
            draw_us: self.read_u64()?,
            state: SceneState {
                mesh_rotation: self.read_angles()?,
                group_rotation: self.read_angles()?,
            },
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_FRAME_REQUEST => self.decode_frame_request(),
            TAG_STATUS_CHANGE => self.decode_status_change(),
            TAG_RESIZE => self.decode_resize(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
