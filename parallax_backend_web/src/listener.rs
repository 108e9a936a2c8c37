// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Event, EventTarget};

/// A DOM event listener that detaches itself when dropped.
pub(crate) struct EventListener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    /// Attaches `handler` to `event` on `target`.
    ///
    /// Returns `None` (after logging) if the browser rejects the listener.
    pub(crate) fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                closure,
            }),
            Err(err) => {
                log::warn!("could not listen for `{event}`: {err:?}");
                None
            }
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for EventListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventListener")
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
