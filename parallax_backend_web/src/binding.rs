// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM wiring for the hero centerpiece.
//!
//! [`init_hero`] finds the container, builds the renderer and the
//! [`LifecycleBinder`], and attaches the pointer, resize and visibility
//! listeners that feed it. Everything is kept by the returned [`WebHero`]
//! until [`WebHero::teardown`] (or drop).

use alloc::rc::{Rc, Weak};
use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::{OnceCell, RefCell};

use kurbo::Point;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, MouseEvent, VisibilityState, Window};

use parallax_core::binder::{LifecycleBinder, LifecycleEvent};
use parallax_core::config::HeroConfig;
use parallax_core::controller::{LoopStatus, Visibility};
use parallax_core::error::InitError;
use parallax_core::host::Container;

use crate::container::DomContainer;
use crate::listener::EventListener;
use crate::raf::RafScheduler;
use crate::webgl::WebGlRenderer;

type WebBinder = LifecycleBinder<RafScheduler, WebGlRenderer>;

/// Media query matched when the user asked for less motion.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Whether the user prefers reduced motion. Unsupported queries read as no
/// preference.
#[must_use]
pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|mq| mq.matches())
}

fn page_visibility(document: &Document) -> Visibility {
    match document.visibility_state() {
        VisibilityState::Hidden => Visibility::Hidden,
        _ => Visibility::Visible,
    }
}

/// A running (or degraded) hero centerpiece and its listeners.
#[derive(Debug)]
pub struct WebHero {
    binder: Rc<RefCell<WebBinder>>,
    listeners: Vec<EventListener>,
}

/// Starts the centerpiece in the element with id `container_id`.
///
/// A missing container or an invalid `config` is an error. A renderer that
/// cannot be created is not: the hero is returned degraded, never drawing,
/// and the failure is logged.
pub fn init_hero(container_id: &str, config: &HeroConfig) -> Result<WebHero, InitError> {
    config.validate()?;

    let missing = || InitError::NoContainer(container_id.to_string());
    let window = web_sys::window().ok_or_else(missing)?;
    let document = window.document().ok_or_else(missing)?;
    let element: HtmlElement = document
        .get_element_by_id(container_id)
        .and_then(|el| el.dyn_into().ok())
        .ok_or_else(missing)?;
    let container = DomContainer::new(window.clone(), element);

    let renderer = match WebGlRenderer::new(&document, container.element(), config) {
        Ok(renderer) => Some(renderer),
        Err(err) => {
            log::warn!("{err}");
            None
        }
    };

    // Frames reach the binder through a weak slot filled once it exists.
    let slot: Rc<OnceCell<Weak<RefCell<WebBinder>>>> = Rc::default();
    let scheduler = RafScheduler::new({
        let slot = Rc::clone(&slot);
        move |now| {
            if let Some(binder) = slot.get().and_then(Weak::upgrade)
                && let Ok(mut binder) = binder.try_borrow_mut()
            {
                binder.controller_mut().on_frame(now);
            }
        }
    });

    let binder = Rc::new(RefCell::new(LifecycleBinder::initialize(
        config,
        Some(&container),
        scheduler,
        renderer,
        prefers_reduced_motion(&window),
        page_visibility(&document),
    )));
    let _ = slot.set(Rc::downgrade(&binder));

    let mut listeners = Vec::with_capacity(4);
    let element: &web_sys::EventTarget = container.element();

    listeners.extend(EventListener::attach(element, "pointermove", {
        let binder = Rc::clone(&binder);
        let container = container.clone();
        move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let client = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
            dispatch(
                &binder,
                LifecycleEvent::PointerMove {
                    client,
                    rect: container.bounding_rect(),
                },
            );
        }
    }));

    listeners.extend(EventListener::attach(element, "pointerleave", {
        let binder = Rc::clone(&binder);
        move |_| dispatch(&binder, LifecycleEvent::PointerLeave)
    }));

    listeners.extend(EventListener::attach(&window, "resize", {
        let binder = Rc::clone(&binder);
        let container = container.clone();
        move |_| {
            if let Ok(mut binder) = binder.try_borrow_mut() {
                binder.remeasure(&container);
            }
        }
    }));

    listeners.extend(EventListener::attach(&document, "visibilitychange", {
        let binder = Rc::clone(&binder);
        let document = document.clone();
        move |_| {
            dispatch(
                &binder,
                LifecycleEvent::Visibility(page_visibility(&document)),
            );
        }
    }));

    Ok(WebHero { binder, listeners })
}

fn dispatch(binder: &RefCell<WebBinder>, event: LifecycleEvent) {
    match binder.try_borrow_mut() {
        Ok(mut binder) => binder.handle(event),
        Err(_) => log::debug!("dropped {event:?}: binder busy"),
    }
}

impl WebHero {
    /// Detaches every listener and stops the loop for good.
    ///
    /// Idempotent.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        dispatch(&self.binder, LifecycleEvent::Teardown);
    }

    /// Whether the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.binder.borrow().controller().status() == LoopStatus::Running
    }

    /// Whether a renderer could be created.
    #[must_use]
    pub fn has_renderer(&self) -> bool {
        self.binder.borrow().controller().renderer().is_some()
    }
}

impl Drop for WebHero {
    fn drop(&mut self) {
        self.teardown();
    }
}
