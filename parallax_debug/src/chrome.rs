// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use parallax_core::controller::LoopStatus;
use parallax_core::trace::FrameRequestKind;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
/// Timestamps are already in microseconds and pass through unchanged.
///
/// Tick phases become duration slices on thread 0, lifecycle transitions and
/// frame requests are instants on thread 1, and a `running` counter tracks
/// the loop status.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Loop",
                    "ts": e.now.micros(),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "delta_ms": e.delta.map(|d| d.as_millis_f64()),
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": e.timestamp.micros(),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": e.timestamp.micros(),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::FrameRequest(e) => {
                let name = match e.kind {
                    FrameRequestKind::Scheduled => "ScheduleFrame",
                    FrameRequestKind::Cancelled => "CancelFrame",
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Lifecycle",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::StatusChange(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?} -> {:?}", e.from, e.to),
                    "cat": "Lifecycle",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "tid": 1,
                    "s": "p",
                    "args": {
                        "cause": format!("{:?}", e.cause),
                    }
                }));
                events.push(json!({
                    "ph": "C",
                    "name": "running",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "args": {
                        "running": u8::from(e.to == LoopStatus::Running),
                    }
                }));
            }
            RecordedEvent::Resize(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Resize",
                    "cat": "Lifecycle",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "tid": 1,
                    "s": "p",
                    "args": {
                        "width": e.width,
                        "height": e.height,
                        "pixel_ratio": e.pixel_ratio,
                        "aspect": e.aspect,
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": s.now.micros(),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": s.frame_index,
                        "input_us": s.input_us,
                        "advance_us": s.advance_us,
                        "draw_us": s.draw_us,
                        "mesh_rotation": [s.state.mesh_rotation.x, s.state.mesh_rotation.y],
                        "group_rotation": [s.state.group_rotation.x, s.state.group_rotation.y],
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use parallax_core::time::HostTime;
    use parallax_core::trace::{
        FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, PhaseKind, StatusCause,
        StatusChangeEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&FrameTickEvent {
            frame_index: 1,
            now: HostTime(1_000),
            delta: None,
        });
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Advance,
            timestamp: HostTime(1_000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 1,
            phase: PhaseKind::Advance,
            timestamp: HostTime(1_040),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "FrameTick");
        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "Advance");
        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 1_040);
    }

    #[test]
    fn status_changes_drive_the_running_counter() {
        let mut rec = RecorderSink::new();
        rec.on_status_change(&StatusChangeEvent {
            from: LoopStatus::Stopped,
            to: LoopStatus::Running,
            cause: StatusCause::Explicit,
            at: HostTime(0),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["name"], "Stopped -> Running");
        assert_eq!(parsed[1]["ph"], "C");
        assert_eq!(parsed[1]["args"]["running"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty());
    }
}
