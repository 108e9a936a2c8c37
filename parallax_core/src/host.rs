// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract between the render loop and the page that hosts it.
//!
//! The core never talks to a browser. A backend supplies three collaborators:
//!
//! - a [`FrameScheduler`] that requests (and cancels) the next animation
//!   frame and reads the monotonic clock,
//! - a [`SceneRenderer`] that sizes its drawing surface and draws the scene,
//! - a [`Container`] that reports the element's geometry.
//!
//! All three are driven from a single thread. Scheduled frames are delivered
//! back to the controller through
//! [`RenderLoopController::on_frame`](crate::controller::RenderLoopController::on_frame).

use core::fmt::Debug;

use kurbo::{Rect, Size};

use crate::scene::SceneGraph;
use crate::time::HostTime;
use crate::viewport::Viewport;

/// Requests one-shot frame callbacks.
pub trait FrameScheduler {
    /// Identifies one scheduled callback.
    type Handle: Copy + PartialEq + Debug;

    /// Requests a callback on the next frame and returns its handle.
    fn schedule_frame(&mut self) -> Self::Handle;

    /// Cancels a callback that has not fired yet.
    fn cancel_frame(&mut self, handle: Self::Handle);

    /// Reads the monotonic clock.
    fn now(&self) -> HostTime;
}

/// Draws the scene onto a surface.
pub trait SceneRenderer {
    /// Resizes the drawing surface. The surface content may be lost.
    fn resize(&mut self, viewport: &Viewport);

    /// Draws one frame of `scene`.
    fn render(&mut self, scene: &SceneGraph);
}

/// The element the scene is mounted into.
pub trait Container {
    /// Inner size in CSS pixels.
    fn client_size(&self) -> Size;

    /// Border box in client coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Device pixels per CSS pixel.
    fn device_pixel_ratio(&self) -> f64;
}

impl<C: Container + ?Sized> Container for &C {
    fn client_size(&self) -> Size {
        (**self).client_size()
    }

    fn bounding_rect(&self) -> Rect {
        (**self).bounding_rect()
    }

    fn device_pixel_ratio(&self) -> f64 {
        (**self).device_pixel_ratio()
    }
}
