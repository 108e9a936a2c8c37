// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render-loop state machine.
//!
//! [`RenderLoopController`] owns the scene and the collaborators that drive
//! it, and guarantees that at most one frame callback is outstanding:
//!
//! ```text
//!             start()                      on_frame(now)
//!   Stopped ─────────► Running ──┐   input → advance → draw → schedule
//!      ▲                  │  ▲    └──────────────────────────────┘
//!      │  stop() / Hidden │  │
//!      └──────────────────┘  └── Visible (if stopped by Hidden)
//! ```
//!
//! The pending handle is the only record of a scheduled callback. Every path
//! out of `Running` cancels exactly that handle, and nothing but `start()` and
//! `on_frame()` ever schedules, so a resize or a repeated `start()` cannot
//! leave an orphaned callback behind.
//!
//! When the environment prevents animation the controller degrades instead of
//! failing: reduced motion draws one static frame, and a missing container or
//! renderer disables the controller for good.

use alloc::boxed::Box;
use core::fmt;
use core::mem;

use kurbo::{Point, Rect};

use crate::config::HeroConfig;
use crate::host::{FrameScheduler, SceneRenderer};
use crate::pointer::{PointerState, PointerTracker};
use crate::scene::{MotionMode, SceneGraph};
use crate::smoothing::SmoothedPoint;
use crate::time::HostTime;
use crate::trace::{
    FrameRequestEvent, FrameRequestKind, FrameSummaryBuilder, FrameTickEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, ResizeEvent, StatusCause, StatusChangeEvent, TraceSink, Tracer,
};
use crate::viewport::Viewport;

/// Whether the loop is ticking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoopStatus {
    /// No tick is scheduled.
    #[default]
    Stopped,
    /// Exactly one tick is scheduled.
    Running,
}

/// Result of [`RenderLoopController::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StartOutcome {
    /// The loop is now running and its first tick is scheduled.
    Started,
    /// The loop was already running; nothing was scheduled.
    AlreadyRunning,
    /// Reduced motion: the static pose is drawn and the loop stays stopped.
    StaticFrame,
    /// No container or renderer, or the controller was torn down.
    Unavailable,
}

/// Page visibility as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The page is visible.
    #[default]
    Visible,
    /// The page is hidden (background tab, minimized window).
    Hidden,
}

/// Environment facts gathered once at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// The user prefers reduced motion.
    pub reduced_motion: bool,
    /// A drawing context could be created.
    pub renderer_available: bool,
    /// The container element exists.
    pub container_present: bool,
}

impl Capabilities {
    /// Everything available and motion allowed.
    pub const FULL: Self = Self {
        reduced_motion: false,
        renderer_available: true,
        container_present: true,
    };

    /// Whether anything can be drawn at all.
    #[must_use]
    pub const fn can_draw(&self) -> bool {
        self.renderer_available && self.container_present
    }

    /// The motion mode these capabilities allow.
    #[must_use]
    pub const fn motion_mode(&self) -> MotionMode {
        if self.reduced_motion {
            MotionMode::Reduced
        } else {
            MotionMode::Animated
        }
    }
}

/// Drives a [`SceneGraph`] from frame callbacks.
///
/// See the [module docs](self) for the state machine.
pub struct RenderLoopController<S: FrameScheduler, R: SceneRenderer> {
    scheduler: S,
    renderer: Option<R>,
    scene: SceneGraph,
    pointer: PointerTracker,
    smoothed: SmoothedPoint,
    viewport: Viewport,
    capabilities: Capabilities,
    status: LoopStatus,
    pending: Option<S::Handle>,
    resume_on_visible: bool,
    disabled: bool,
    static_drawn: bool,
    frame_index: u64,
    last_frame: Option<HostTime>,
    sink: Option<Box<dyn TraceSink>>,
}

impl<S: FrameScheduler, R: SceneRenderer> fmt::Debug for RenderLoopController<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLoopController")
            .field("status", &self.status)
            .field("pending", &self.pending)
            .field("viewport", &self.viewport)
            .field("capabilities", &self.capabilities)
            .field("disabled", &self.disabled)
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl<S: FrameScheduler, R: SceneRenderer> RenderLoopController<S, R> {
    /// Builds the scene and sizes the renderer. The loop starts stopped.
    ///
    /// `capabilities.renderer_available` is forced off when `renderer` is
    /// `None`. A controller that cannot draw is disabled from the outset.
    pub fn new(
        config: &HeroConfig,
        scheduler: S,
        renderer: Option<R>,
        viewport: Viewport,
        mut capabilities: Capabilities,
    ) -> Self {
        capabilities.renderer_available &= renderer.is_some();
        let scene = SceneGraph::new(config, viewport.aspect(), capabilities.motion_mode());
        let mut renderer = renderer;
        if capabilities.can_draw()
            && let Some(r) = renderer.as_mut()
        {
            r.resize(&viewport);
        }
        Self {
            scheduler,
            renderer,
            scene,
            pointer: PointerTracker::new(),
            smoothed: SmoothedPoint::new(Point::ZERO, config.pointer_smoothing),
            viewport,
            capabilities,
            status: LoopStatus::Stopped,
            pending: None,
            resume_on_visible: false,
            disabled: !capabilities.can_draw(),
            static_drawn: false,
            frame_index: 0,
            last_frame: None,
            sink: None,
        }
    }

    /// Installs a trace sink. Events are only delivered with the `trace`
    /// feature enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Removes and returns the trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Starts the loop.
    pub fn start(&mut self) -> StartOutcome {
        self.start_with(StatusCause::Explicit)
    }

    fn start_with(&mut self, cause: StatusCause) -> StartOutcome {
        if self.disabled {
            return StartOutcome::Unavailable;
        }
        if self.status == LoopStatus::Running {
            return StartOutcome::AlreadyRunning;
        }
        if self.capabilities.reduced_motion {
            if !self.static_drawn {
                self.scene.apply_static_pose();
                self.draw();
                self.static_drawn = true;
                log::debug!("reduced motion: drew static frame");
            }
            return StartOutcome::StaticFrame;
        }
        self.set_status(LoopStatus::Running, cause);
        self.last_frame = None;
        self.schedule();
        StartOutcome::Started
    }

    /// Stops the loop, cancelling the pending tick. No-op when stopped.
    pub fn stop(&mut self) {
        self.stop_with(StatusCause::Explicit);
    }

    /// Returns whether the loop was running.
    fn stop_with(&mut self, cause: StatusCause) -> bool {
        if self.status != LoopStatus::Running {
            return false;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
            self.trace_request(FrameRequestKind::Cancelled);
        }
        self.set_status(LoopStatus::Stopped, cause);
        true
    }

    /// Runs one tick: input, advance, draw, then schedules the next tick.
    ///
    /// Ignored unless the loop is running with a tick pending, so a stale
    /// callback that slipped past a cancellation does nothing.
    pub fn on_frame(&mut self, now: HostTime) {
        if self.status != LoopStatus::Running || self.pending.take().is_none() {
            return;
        }
        self.frame_index += 1;
        let delta = self.last_frame.map(|t| now.saturating_duration_since(t));
        self.last_frame = Some(now);

        let tick = FrameTickEvent {
            frame_index: self.frame_index,
            now,
            delta,
        };
        self.tracer().frame_tick(&tick);
        let mut summary = FrameSummaryBuilder::new(&tick);

        self.phase_begin(&mut summary, PhaseKind::Input);
        let target = self.pointer.state().target();
        let smoothed = self.smoothed.step(target);
        self.phase_end(&mut summary, PhaseKind::Input);

        self.phase_begin(&mut summary, PhaseKind::Advance);
        self.scene.advance(smoothed, 1);
        self.phase_end(&mut summary, PhaseKind::Advance);

        self.phase_begin(&mut summary, PhaseKind::Draw);
        self.draw();
        self.phase_end(&mut summary, PhaseKind::Draw);

        summary.set_state(self.scene.state());
        self.tracer().frame_summary(&summary.finish());
        self.schedule();
    }

    /// Applies a new viewport to the camera and renderer.
    ///
    /// Never changes [`LoopStatus`] and never schedules. A static frame, if
    /// one was drawn, is redrawn because resizing clears the surface.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.disabled {
            return;
        }
        self.viewport = viewport;
        self.scene.set_aspect(viewport.aspect());
        if let Some(r) = self.renderer.as_mut() {
            r.resize(&viewport);
        }
        if self.sink.is_some() {
            let at = self.scheduler.now();
            self.tracer().resize(&ResizeEvent {
                width: viewport.width(),
                height: viewport.height(),
                pixel_ratio: viewport.pixel_ratio(),
                aspect: viewport.aspect(),
                at,
            });
        }
        if self.static_drawn {
            self.draw();
        }
    }

    /// Pauses on `Hidden` and resumes on the next `Visible` if the pause
    /// interrupted a running loop.
    pub fn on_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                if self.stop_with(StatusCause::Visibility) {
                    self.resume_on_visible = true;
                }
            }
            Visibility::Visible => {
                if mem::take(&mut self.resume_on_visible) {
                    self.start_with(StatusCause::Visibility);
                }
            }
        }
    }

    /// Arranges for the next `Visible` signal to start the loop. Used when
    /// the page is hidden at initialization.
    pub fn defer_until_visible(&mut self) {
        if !self.disabled && self.status == LoopStatus::Stopped {
            self.resume_on_visible = true;
        }
    }

    /// Records a pointer move over the tracked element.
    pub fn on_pointer_move(&mut self, client: Point, rect: Rect) -> PointerState {
        if self.disabled {
            return self.pointer.state();
        }
        self.pointer.on_pointer_move(client, rect)
    }

    /// Returns the pointer target to the centre.
    pub fn recenter_pointer(&mut self) {
        if !self.disabled {
            self.pointer.recenter();
        }
    }

    /// Stops the loop and ignores every later signal.
    pub fn teardown(&mut self) {
        self.stop_with(StatusCause::Teardown);
        self.resume_on_visible = false;
        self.disabled = true;
    }

    /// Current loop status.
    #[must_use]
    pub const fn status(&self) -> LoopStatus {
        self.status
    }

    /// Handle of the scheduled tick, if any.
    #[must_use]
    pub fn pending(&self) -> Option<S::Handle> {
        self.pending
    }

    /// The scene.
    #[must_use]
    pub const fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The current viewport.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Capabilities captured at construction.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// The frame scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The frame scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The renderer, if one is available.
    #[must_use]
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// The raw pointer target.
    #[must_use]
    pub const fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }

    /// The smoothed pointer position last fed to the scene.
    #[must_use]
    pub const fn smoothed_pointer(&self) -> Point {
        self.smoothed.current()
    }

    /// Number of ticks run so far.
    #[must_use]
    pub const fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Whether the controller ignores all signals.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether a reduced-motion static frame has been drawn.
    #[must_use]
    pub const fn has_static_frame(&self) -> bool {
        self.static_drawn
    }

    fn draw(&mut self) {
        if let Some(r) = self.renderer.as_mut() {
            r.render(&self.scene);
        }
    }

    fn schedule(&mut self) {
        debug_assert!(self.pending.is_none(), "a tick is already pending");
        self.pending = Some(self.scheduler.schedule_frame());
        self.trace_request(FrameRequestKind::Scheduled);
    }

    fn set_status(&mut self, to: LoopStatus, cause: StatusCause) {
        let from = mem::replace(&mut self.status, to);
        log::debug!("render loop {from:?} -> {to:?} ({cause:?})");
        if self.sink.is_some() {
            let at = self.scheduler.now();
            self.tracer().status_change(&StatusChangeEvent {
                from,
                to,
                cause,
                at,
            });
        }
    }

    fn tracer(&mut self) -> Tracer<'_> {
        match self.sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        }
    }

    fn trace_request(&mut self, kind: FrameRequestKind) {
        if self.sink.is_none() {
            return;
        }
        let frame_index = match kind {
            FrameRequestKind::Scheduled => self.frame_index + 1,
            FrameRequestKind::Cancelled => self.frame_index,
        };
        let at = self.scheduler.now();
        self.tracer().frame_request(&FrameRequestEvent {
            frame_index,
            kind,
            at,
        });
    }

    fn phase_begin(&mut self, summary: &mut FrameSummaryBuilder, phase: PhaseKind) {
        if self.sink.is_none() {
            return;
        }
        let timestamp = self.scheduler.now();
        summary.phase_begin(phase, timestamp);
        let frame_index = self.frame_index;
        self.tracer().phase_begin(&PhaseBeginEvent {
            frame_index,
            phase,
            timestamp,
        });
    }

    fn phase_end(&mut self, summary: &mut FrameSummaryBuilder, phase: PhaseKind) {
        if self.sink.is_none() {
            return;
        }
        let timestamp = self.scheduler.now();
        summary.phase_end(phase, timestamp);
        let frame_index = self.frame_index;
        self.tracer().phase_end(&PhaseEndEvent {
            frame_index,
            phase,
            timestamp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[derive(Debug, Default)]
    struct Scripted {
        next: u32,
        scheduled: Vec<u32>,
        cancelled: Vec<u32>,
    }

    impl FrameScheduler for Scripted {
        type Handle = u32;

        fn schedule_frame(&mut self) -> u32 {
            self.next += 1;
            self.scheduled.push(self.next);
            self.next
        }

        fn cancel_frame(&mut self, handle: u32) {
            self.cancelled.push(handle);
        }

        fn now(&self) -> HostTime {
            HostTime(u64::from(self.next) * 16_667)
        }
    }

    #[derive(Debug, Default)]
    struct Counting {
        draws: u32,
        resizes: u32,
    }

    impl SceneRenderer for Counting {
        fn resize(&mut self, _viewport: &Viewport) {
            self.resizes += 1;
        }

        fn render(&mut self, _scene: &SceneGraph) {
            self.draws += 1;
        }
    }

    fn controller(caps: Capabilities) -> RenderLoopController<Scripted, Counting> {
        RenderLoopController::new(
            &HeroConfig::torus_knot(),
            Scripted::default(),
            Some(Counting::default()),
            Viewport::new(400.0, 300.0, 1.0, 2.0),
            caps,
        )
    }

    #[test]
    fn start_twice_schedules_once() {
        let mut c = controller(Capabilities::FULL);
        assert_eq!(c.start(), StartOutcome::Started);
        assert_eq!(c.start(), StartOutcome::AlreadyRunning);
        assert_eq!(c.scheduler().scheduled, [1]);
        assert_eq!(c.pending(), Some(1));
    }

    #[test]
    fn frame_reschedules_and_draws() {
        let mut c = controller(Capabilities::FULL);
        c.start();
        c.on_frame(HostTime(16_667));
        assert_eq!(c.pending(), Some(2));
        assert_eq!(c.renderer().map(|r| r.draws), Some(1));
        assert_eq!(c.frame_index(), 1);
    }

    #[test]
    fn frame_without_pending_tick_is_ignored() {
        let mut c = controller(Capabilities::FULL);
        c.on_frame(HostTime(1));
        assert_eq!(c.frame_index(), 0);
        c.start();
        c.stop();
        c.on_frame(HostTime(2));
        assert_eq!(c.frame_index(), 0);
        assert!(c.scheduler().scheduled.len() == 1);
    }

    #[test]
    fn stop_cancels_the_pending_handle() {
        let mut c = controller(Capabilities::FULL);
        c.start();
        c.on_frame(HostTime(10));
        c.on_frame(HostTime(20));
        c.stop();
        assert_eq!(c.scheduler().cancelled, [3]);
        assert_eq!(c.pending(), None);
        assert_eq!(c.status(), LoopStatus::Stopped);
    }

    #[test]
    fn stop_when_stopped_does_not_cancel() {
        let mut c = controller(Capabilities::FULL);
        c.stop();
        c.start();
        c.stop();
        c.stop();
        assert_eq!(c.scheduler().cancelled, [1]);
    }

    #[test]
    fn resize_never_touches_the_pending_tick() {
        let mut c = controller(Capabilities::FULL);
        c.start();
        c.resize(Viewport::new(800.0, 0.0, 1.0, 2.0));
        assert_eq!(c.pending(), Some(1));
        assert_eq!(c.scheduler().scheduled, [1]);
        assert!(c.scene().camera().aspect.is_finite());
        assert!(c.scene().camera().aspect > 0.0);
        assert_eq!(c.renderer().map(|r| r.resizes), Some(2));
    }

    #[test]
    fn reduced_motion_draws_one_static_frame() {
        let mut c = controller(Capabilities {
            reduced_motion: true,
            ..Capabilities::FULL
        });
        assert_eq!(c.start(), StartOutcome::StaticFrame);
        assert_eq!(c.start(), StartOutcome::StaticFrame);
        c.on_frame(HostTime(5));
        assert_eq!(c.status(), LoopStatus::Stopped);
        assert!(c.scheduler().scheduled.is_empty());
        assert_eq!(c.renderer().map(|r| r.draws), Some(1));
        assert!(c.has_static_frame());
    }

    #[test]
    fn static_frame_is_redrawn_after_resize() {
        let mut c = controller(Capabilities {
            reduced_motion: true,
            ..Capabilities::FULL
        });
        c.resize(Viewport::new(640.0, 480.0, 1.0, 2.0));
        assert_eq!(c.renderer().map(|r| r.draws), Some(0));
        c.start();
        c.resize(Viewport::new(320.0, 240.0, 1.0, 2.0));
        assert_eq!(c.renderer().map(|r| r.draws), Some(2));
    }

    #[test]
    fn missing_renderer_disables_the_loop() {
        let mut c: RenderLoopController<Scripted, Counting> = RenderLoopController::new(
            &HeroConfig::torus_knot(),
            Scripted::default(),
            None,
            Viewport::FALLBACK,
            Capabilities::FULL,
        );
        assert!(!c.capabilities().renderer_available);
        assert_eq!(c.start(), StartOutcome::Unavailable);
        c.on_visibility(Visibility::Visible);
        assert!(c.scheduler().scheduled.is_empty());
    }

    #[test]
    fn hide_then_show_resumes_without_reset() {
        let mut c = controller(Capabilities::FULL);
        c.start();
        for t in 1..=5 {
            c.on_frame(HostTime(t * 16_667));
        }
        let before = c.scene().state();
        c.on_visibility(Visibility::Hidden);
        assert_eq!(c.status(), LoopStatus::Stopped);
        assert_eq!(c.pending(), None);
        c.on_visibility(Visibility::Visible);
        assert_eq!(c.status(), LoopStatus::Running);
        assert_eq!(c.scene().state(), before);
    }

    #[test]
    fn visible_without_prior_hide_does_not_start() {
        let mut c = controller(Capabilities::FULL);
        c.on_visibility(Visibility::Visible);
        assert_eq!(c.status(), LoopStatus::Stopped);
        c.defer_until_visible();
        c.on_visibility(Visibility::Visible);
        assert_eq!(c.status(), LoopStatus::Running);
    }

    #[test]
    fn teardown_ignores_later_signals() {
        let mut c = controller(Capabilities::FULL);
        c.start();
        c.on_visibility(Visibility::Hidden);
        c.teardown();
        c.on_visibility(Visibility::Visible);
        assert_eq!(c.start(), StartOutcome::Unavailable);
        c.resize(Viewport::new(10.0, 10.0, 1.0, 1.0));
        assert_eq!(c.status(), LoopStatus::Stopped);
        assert!(c.is_disabled());
        assert_eq!(c.scheduler().scheduled, [1]);
        assert_eq!(c.scheduler().cancelled, [1]);
    }

    #[test]
    fn pointer_is_smoothed_before_advancing() {
        let mut c = controller(Capabilities::FULL);
        c.start();
        let rect = Rect::new(0.0, 0.0, 400.0, 300.0);
        c.on_pointer_move(Point::new(400.0, 0.0), rect);
        let previous = c.smoothed_pointer();
        c.on_frame(HostTime(1));
        let now = c.smoothed_pointer();
        assert_eq!(now.x - previous.x, 0.08 * (1.0 - previous.x));
        assert_eq!(now.y - previous.y, 0.08 * (-1.0 - previous.y));
    }
}
