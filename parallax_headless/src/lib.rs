// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic host collaborators for driving `parallax_core` without a
//! browser.
//!
//! - [`FrameQueue`] is a [`FrameScheduler`](parallax_core::host::FrameScheduler)
//!   that records every request and cancellation and fires frames only when
//!   told to, on a simulated clock.
//! - [`RecordingRenderer`] remembers every resize and draw.
//! - [`FixedContainer`] reports a settable size and pixel ratio.
//! - [`DeltaHistory`] keeps a ring of recent frame deltas and renders it as
//!   an ASCII sparkline.
//!
//! Tests and the trace demo combine them with [`pump`] to run a controller
//! for a number of frames.

#![no_std]

extern crate alloc;

mod container;
mod history;
mod queue;
mod renderer;

pub use container::FixedContainer;
pub use history::DeltaHistory;
pub use queue::{FrameId, FrameQueue};
pub use renderer::{DrawRecord, RecordingRenderer};

use parallax_core::controller::RenderLoopController;
use parallax_core::host::SceneRenderer;

/// Fires up to `frames` scheduled callbacks into `controller`.
///
/// Stops early when nothing is pending. Returns how many frames fired.
pub fn pump<R: SceneRenderer>(
    controller: &mut RenderLoopController<FrameQueue, R>,
    frames: usize,
) -> usize {
    let mut fired = 0;
    while fired < frames {
        let Some((_, now)) = controller.scheduler_mut().fire_next() else {
            break;
        };
        controller.on_frame(now);
        fired += 1;
    }
    fired
}
