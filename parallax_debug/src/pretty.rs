// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use parallax_core::trace::{
    FrameRequestEvent, FrameRequestKind, FrameSummary, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, ResizeEvent, StatusChangeEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    phases: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("phases", &self.phases)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            phases: true,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            phases: true,
        }
    }

    /// Skips per-phase begin/end lines; summaries still carry the durations.
    #[must_use]
    pub fn without_phases(mut self) -> Self {
        self.phases = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Input => "input",
        PhaseKind::Advance => "advance",
        PhaseKind::Draw => "draw",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let delta = e
            .delta
            .map_or_else(|| "-".to_owned(), |d| format!("{:.3}ms", d.as_millis_f64()));
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={}µs delta={delta}",
            e.frame_index,
            e.now.micros(),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        if !self.phases {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {}µs",
            e.frame_index,
            phase_name(e.phase),
            e.timestamp.micros(),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        if !self.phases {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {}µs",
            e.frame_index,
            phase_name(e.phase),
            e.timestamp.micros(),
        );
    }

    fn on_frame_request(&mut self, e: &FrameRequestEvent) {
        let verb = match e.kind {
            FrameRequestKind::Scheduled => "schedule",
            FrameRequestKind::Cancelled => "cancel",
        };
        let _ = writeln!(
            self.writer,
            "[request] {verb} frame={} at {}µs",
            e.frame_index,
            e.at.micros(),
        );
    }

    fn on_status_change(&mut self, e: &StatusChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[status] {:?} -> {:?} ({:?}) at {}µs",
            e.from,
            e.to,
            e.cause,
            e.at.micros(),
        );
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        let _ = writeln!(
            self.writer,
            "[resize] {}x{} @{}x aspect={:.3} at {}µs",
            e.width,
            e.height,
            e.pixel_ratio,
            e.aspect,
            e.at.micros(),
        );
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} input={}µs advance={}µs draw={}µs \
             mesh=({:.4}, {:.4}) group=({:.4}, {:.4})",
            s.frame_index,
            s.input_us,
            s.advance_us,
            s.draw_us,
            s.state.mesh_rotation.x,
            s.state.mesh_rotation.y,
            s.state.group_rotation.x,
            s.state.group_rotation.y,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_core::controller::LoopStatus;
    use parallax_core::time::{Duration, HostTime};
    use parallax_core::trace::StatusCause;

    #[test]
    fn pretty_print_tick() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_frame_tick(&FrameTickEvent {
            frame_index: 1,
            now: HostTime(1_000),
            delta: Some(Duration(16_667)),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[tick]"), "got: {output}");
        assert!(output.contains("frame=1"), "got: {output}");
        assert!(output.contains("delta=16.667ms"), "got: {output}");
    }

    #[test]
    fn phases_can_be_suppressed() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).without_phases();
        sink.on_phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Draw,
            timestamp: HostTime(5),
        });
        sink.on_status_change(&StatusChangeEvent {
            from: LoopStatus::Running,
            to: LoopStatus::Stopped,
            cause: StatusCause::Visibility,
            at: HostTime(9),
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(!output.contains("[phase"), "got: {output}");
        assert!(
            output.contains("[status] Running -> Stopped (Visibility)"),
            "got: {output}"
        );
    }
}
