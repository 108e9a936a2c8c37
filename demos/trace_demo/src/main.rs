// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated hero lifecycle that exercises the tracing and diagnostics
//! pipeline.
//!
//! Drives a [`RenderLoopController`] with the deterministic
//! [`FrameQueue`](parallax_headless::FrameQueue) through idle frames, a pointer
//! sweep, a resize and a hide/show cycle. Events go to both a
//! [`PrettyPrintSink`] and a [`RecorderSink`]; the recording is then exported
//! as a Chrome trace and summarized as a frame-delta sparkline.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use kurbo::{Point, Rect};

use parallax_core::binder::{LifecycleBinder, LifecycleEvent};
use parallax_core::config::HeroConfig;
use parallax_core::controller::Visibility;
use parallax_core::time::Duration;
use parallax_core::trace::{
    FrameRequestEvent, FrameSummary, FrameTickEvent, PhaseBeginEvent, PhaseEndEvent, ResizeEvent,
    StatusChangeEvent, TraceSink,
};
use parallax_debug::pretty::PrettyPrintSink;
use parallax_debug::recorder::{RecordedEvent, RecorderSink, decode};
use parallax_headless::{DeltaHistory, FixedContainer, FrameQueue, RecordingRenderer, pump};

const IDLE_FRAMES: usize = 30;
const SWEEP_FRAMES: usize = 30;

/// Forwards every event to the terminal and to a shared recording.
struct Fanout {
    pretty: PrettyPrintSink,
    recorder: Rc<RefCell<RecorderSink>>,
}

macro_rules! fan_out {
    ($($method:ident($ty:ty);)*) => {
        impl TraceSink for Fanout {
            $(
                fn $method(&mut self, e: &$ty) {
                    self.pretty.$method(e);
                    self.recorder.borrow_mut().$method(e);
                }
            )*
        }
    };
}

fan_out! {
    on_frame_tick(FrameTickEvent);
    on_phase_begin(PhaseBeginEvent);
    on_phase_end(PhaseEndEvent);
    on_frame_request(FrameRequestEvent);
    on_status_change(StatusChangeEvent);
    on_resize(ResizeEvent);
    on_frame_summary(FrameSummary);
}

fn main() {
    let config = HeroConfig::torus_knot();
    let mut container = FixedContainer::new(640.0, 480.0).with_pixel_ratio(2.0);

    let mut binder = LifecycleBinder::initialize(
        &config,
        Some(&container),
        FrameQueue::new(),
        Some(RecordingRenderer::new()),
        false,
        Visibility::Visible,
    );

    let recorder = Rc::new(RefCell::new(RecorderSink::new()));
    binder.controller_mut().set_trace_sink(Box::new(Fanout {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())).without_phases(),
        recorder: Rc::clone(&recorder),
    }));

    // 1. Idle rotation.
    pump(binder.controller_mut(), IDLE_FRAMES);

    // 2. Pointer sweep from the left edge to the right edge.
    let rect = Rect::new(0.0, 0.0, 640.0, 480.0);
    for i in 0..SWEEP_FRAMES {
        let x = 640.0 * i as f64 / (SWEEP_FRAMES - 1) as f64;
        binder.handle(LifecycleEvent::PointerMove {
            client: Point::new(x, 120.0),
            rect,
        });
        pump(binder.controller_mut(), 1);
    }

    // 3. The window shrinks.
    container.set_size(320.0, 240.0);
    binder.remeasure(&container);
    pump(binder.controller_mut(), 5);

    // 4. The tab is hidden for a while, then shown again.
    binder.handle(LifecycleEvent::Visibility(Visibility::Hidden));
    binder
        .controller_mut()
        .scheduler_mut()
        .advance_clock(Duration::from_millis(500));
    binder.handle(LifecycleEvent::Visibility(Visibility::Visible));
    pump(binder.controller_mut(), 5);

    binder.handle(LifecycleEvent::Teardown);
    drop(binder.controller_mut().take_trace_sink());

    let bytes = recorder.borrow().as_bytes().to_vec();

    // -- frame-delta sparkline ---------------------------------------------
    let mut history = DeltaHistory::<32>::default();
    for event in decode(&bytes) {
        if let RecordedEvent::FrameTick(FrameTickEvent {
            delta: Some(delta), ..
        }) = event
        {
            history.push(delta);
        }
    }
    println!(
        "deltas (last {}): [{}] mean {:.2}ms over {} frames",
        history.frame_deltas().len(),
        history.sparkline_ascii(0.0, 50.0),
        history.mean_ms(),
        history.total_frames(),
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    parallax_debug::chrome::export(&bytes, &mut writer).expect("failed to write Chrome trace");

    println!("Wrote {path} ({} bytes recorded)", bytes.len());
}
