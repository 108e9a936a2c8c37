// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame sources.
//!
//! Each callback receives a [`DOMHighResTimeStamp`][mdn] (milliseconds from
//! `performance.now()`), which is converted to microsecond [`HostTime`].
//!
//! - [`RafScheduler`] is the controller's [`FrameScheduler`]: one request per
//!   `schedule_frame` call, cancelled by handle.
//! - [`RafLoop`] re-registers itself every frame until stopped. The cursor
//!   glow runs on it.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use parallax_core::host::FrameScheduler;
use parallax_core::time::HostTime;

// Direct global bindings instead of `web_sys::Window` methods, so a frame
// never has to fetch (and unwrap) the Window object.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(performance_now())
}

type RafClosure = Closure<dyn FnMut(f64)>;

// ---------------------------------------------------------------------------
// RafScheduler
// ---------------------------------------------------------------------------

/// Identifier returned by `requestAnimationFrame`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RafHandle(pub i32);

/// A [`FrameScheduler`] backed by `requestAnimationFrame`.
///
/// Every scheduled frame invokes the same callback with the frame's
/// timestamp. The callback is expected to forward it to
/// [`RenderLoopController::on_frame`](parallax_core::controller::RenderLoopController::on_frame),
/// which requests the next frame itself.
pub struct RafScheduler {
    closure: RafClosure,
}

impl RafScheduler {
    /// Creates a scheduler whose frames call `on_frame`.
    pub fn new(mut on_frame: impl FnMut(HostTime) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            on_frame(HostTime::from_millis_f64(timestamp_ms));
        }) as Box<dyn FnMut(f64)>);
        Self { closure }
    }
}

impl FrameScheduler for RafScheduler {
    type Handle = RafHandle;

    fn schedule_frame(&mut self) -> RafHandle {
        RafHandle(request_animation_frame(self.closure.as_ref().unchecked_ref()))
    }

    fn cancel_frame(&mut self, handle: RafHandle) {
        cancel_animation_frame(handle.0);
    }

    fn now(&self) -> HostTime {
        now()
    }
}

impl core::fmt::Debug for RafScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafScheduler").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// RafLoop
// ---------------------------------------------------------------------------

/// A self-rescheduling `requestAnimationFrame` loop.
///
/// Create with [`RafLoop::new`], then call [`start`](Self::start) to begin
/// receiving callbacks. The loop re-registers itself each frame until
/// [`stop`](Self::stop) is called or the `RafLoop` is dropped.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

struct RafInner {
    /// The JS closure registered with `requestAnimationFrame`.
    ///
    /// Stored in its own `RefCell` so it can be set once in `start()` and
    /// referenced from inside itself without conflicting with `callback`.
    closure: RefCell<Option<RafClosure>>,

    /// The user-supplied per-frame callback.
    callback: RefCell<Box<dyn FnMut(HostTime)>>,

    /// Frames delivered since creation.
    frame_counter: Cell<u64>,

    running: Cell<bool>,

    /// The ID returned by the most recent `requestAnimationFrame` call.
    raf_id: Cell<i32>,
}

impl RafLoop {
    /// Creates a new `RafLoop` that is **not yet running**.
    pub fn new(callback: impl FnMut(HostTime) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Starts the loop. A no-op if already running.
    pub fn start(&self) {
        if self.inner.running.get() {
            return;
        }
        self.inner.running.set(true);

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }
                inner.frame_counter.set(inner.frame_counter.get() + 1);

                // The borrow is scoped so it doesn't overlap with `closure`.
                inner.callback.borrow_mut()(HostTime::from_millis_f64(timestamp_ms));

                if inner.running.get()
                    && let Some(ref closure) = *inner.closure.borrow()
                {
                    let id = request_animation_frame(closure.as_ref().unchecked_ref());
                    inner.raf_id.set(id);
                }
            }) as Box<dyn FnMut(f64)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        if let Some(ref closure) = *self.inner.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.inner.raf_id.set(id);
        }
    }

    /// Stops the loop and cancels the pending callback. Can be restarted.
    pub fn stop(&self) {
        if !self.inner.running.get() {
            return;
        }
        self.inner.running.set(false);
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` if the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Frames delivered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.inner.frame_counter.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish_non_exhaustive()
    }
}
