// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routes host lifecycle signals to the controller.
//!
//! Backends translate DOM events into [`LifecycleEvent`]s and hand them to
//! [`LifecycleBinder::handle`]. The binder is the one place that knows which
//! controller operation each signal maps to.

use kurbo::{Point, Rect};

use crate::config::HeroConfig;
use crate::controller::{Capabilities, RenderLoopController, StartOutcome, Visibility};
use crate::host::{Container, FrameScheduler, SceneRenderer};
use crate::viewport::{Viewport, ViewportMetrics};

/// A signal from the hosting page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LifecycleEvent {
    /// The container was resized.
    Resize(Viewport),
    /// The pointer moved over the tracked element.
    PointerMove {
        /// Pointer position in client coordinates.
        client: Point,
        /// The tracked element's bounding rectangle in client coordinates.
        rect: Rect,
    },
    /// The pointer left the tracked element.
    PointerLeave,
    /// Page visibility changed.
    Visibility(Visibility),
    /// The centerpiece is being removed.
    Teardown,
}

/// Owns a [`RenderLoopController`] and feeds it host signals.
#[derive(Debug)]
pub struct LifecycleBinder<S: FrameScheduler, R: SceneRenderer> {
    controller: RenderLoopController<S, R>,
    metrics: ViewportMetrics,
    recenter_on_leave: bool,
}

impl<S: FrameScheduler, R: SceneRenderer> LifecycleBinder<S, R> {
    /// Measures the container, builds the scene and, if the page is visible,
    /// starts the loop.
    ///
    /// `reduced_motion` is read once here and never re-evaluated. A hidden
    /// page defers the start to the first `Visible` signal.
    pub fn initialize<C: Container + ?Sized>(
        config: &HeroConfig,
        container: Option<&C>,
        scheduler: S,
        renderer: Option<R>,
        reduced_motion: bool,
        visibility: Visibility,
    ) -> Self {
        let metrics = ViewportMetrics::new(config.max_pixel_ratio);
        let viewport = container.map_or(Viewport::FALLBACK, |c| metrics.measure(c));
        let capabilities = Capabilities {
            reduced_motion,
            renderer_available: renderer.is_some(),
            container_present: container.is_some(),
        };
        let mut controller =
            RenderLoopController::new(config, scheduler, renderer, viewport, capabilities);

        match visibility {
            Visibility::Visible => match controller.start() {
                StartOutcome::Unavailable => {
                    log::warn!("hero scene unavailable ({capabilities:?}); leaving page static");
                }
                outcome => log::debug!("hero scene initialized: {outcome:?}"),
            },
            Visibility::Hidden => {
                if controller.is_disabled() {
                    log::warn!("hero scene unavailable ({capabilities:?}); leaving page static");
                }
                controller.defer_until_visible();
            }
        }

        Self {
            controller,
            metrics,
            recenter_on_leave: config.recenter_on_leave,
        }
    }

    /// Routes one signal.
    pub fn handle(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Resize(viewport) => self.controller.resize(viewport),
            LifecycleEvent::PointerMove { client, rect } => {
                self.controller.on_pointer_move(client, rect);
            }
            LifecycleEvent::PointerLeave => {
                if self.recenter_on_leave {
                    self.controller.recenter_pointer();
                }
            }
            LifecycleEvent::Visibility(v) => self.controller.on_visibility(v),
            LifecycleEvent::Teardown => self.controller.teardown(),
        }
    }

    /// Re-measures `container` and routes the result as a resize.
    pub fn remeasure<C: Container + ?Sized>(&mut self, container: &C) {
        let viewport = self.metrics.measure(container);
        self.handle(LifecycleEvent::Resize(viewport));
    }

    /// The controller.
    #[must_use]
    pub const fn controller(&self) -> &RenderLoopController<S, R> {
        &self.controller
    }

    /// The controller, mutably. Frame callbacks go through here.
    pub fn controller_mut(&mut self) -> &mut RenderLoopController<S, R> {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::LoopStatus;
    use crate::scene::SceneGraph;
    use crate::time::HostTime;
    use kurbo::Size;

    #[derive(Debug, Default)]
    struct Counter(u32);

    impl FrameScheduler for Counter {
        type Handle = u32;
        fn schedule_frame(&mut self) -> u32 {
            self.0 += 1;
            self.0
        }
        fn cancel_frame(&mut self, _handle: u32) {}
        fn now(&self) -> HostTime {
            HostTime::ZERO
        }
    }

    #[derive(Debug)]
    struct Sink;

    impl SceneRenderer for Sink {
        fn resize(&mut self, _viewport: &Viewport) {}
        fn render(&mut self, _scene: &SceneGraph) {}
    }

    struct Element(Size);

    impl Container for Element {
        fn client_size(&self) -> Size {
            self.0
        }
        fn bounding_rect(&self) -> Rect {
            Rect::from_origin_size(Point::ZERO, self.0)
        }
        fn device_pixel_ratio(&self) -> f64 {
            3.0
        }
    }

    fn binder(config: &HeroConfig, visibility: Visibility) -> LifecycleBinder<Counter, Sink> {
        LifecycleBinder::initialize(
            config,
            Some(&Element(Size::new(400.0, 300.0))),
            Counter::default(),
            Some(Sink),
            false,
            visibility,
        )
    }

    #[test]
    fn visible_page_starts_immediately() {
        let b = binder(&HeroConfig::default(), Visibility::Visible);
        assert_eq!(b.controller().status(), LoopStatus::Running);
        assert_eq!(b.controller().viewport().pixel_ratio(), 2.0);
    }

    #[test]
    fn hidden_page_starts_on_first_visible() {
        let mut b = binder(&HeroConfig::default(), Visibility::Hidden);
        assert_eq!(b.controller().status(), LoopStatus::Stopped);
        b.handle(LifecycleEvent::Visibility(Visibility::Visible));
        assert_eq!(b.controller().status(), LoopStatus::Running);
    }

    #[test]
    fn missing_container_leaves_controller_disabled() {
        let b: LifecycleBinder<Counter, Sink> = LifecycleBinder::initialize(
            &HeroConfig::default(),
            None::<&Element>,
            Counter::default(),
            Some(Sink),
            false,
            Visibility::Visible,
        );
        assert!(b.controller().is_disabled());
        assert!(!b.controller().capabilities().container_present);
    }

    #[test]
    fn pointer_leave_recenters_only_when_configured() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let corner = LifecycleEvent::PointerMove {
            client: Point::new(100.0, 100.0),
            rect,
        };

        let mut keep = binder(&HeroConfig::default(), Visibility::Visible);
        keep.handle(corner);
        keep.handle(LifecycleEvent::PointerLeave);
        assert_eq!(keep.controller().pointer_state().target(), Point::new(1.0, 1.0));

        let config = HeroConfig {
            recenter_on_leave: true,
            ..HeroConfig::default()
        };
        let mut reset = binder(&config, Visibility::Visible);
        reset.handle(corner);
        reset.handle(LifecycleEvent::PointerLeave);
        assert_eq!(reset.controller().pointer_state().target(), Point::ZERO);
    }

    #[test]
    fn remeasure_routes_a_resize() {
        let mut b = binder(&HeroConfig::default(), Visibility::Visible);
        b.remeasure(&Element(Size::new(800.0, 0.0)));
        let v = b.controller().viewport();
        assert_eq!(v.size(), Size::new(800.0, 1.0));
        assert_eq!(b.controller().pending(), Some(1));
    }
}
