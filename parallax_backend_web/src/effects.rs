// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM wiring for the page's decorative effects.

use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Rect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlImageElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Window,
};

use parallax_core::effects::{
    CursorGlow, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD, REVEALED_CLASS, Tilt, shine_offset,
};

use crate::listener::EventListener;
use crate::raf::RafLoop;

/// Cards that tilt toward the pointer and carry a shine highlight.
pub const CARD_SELECTOR: &str = ".project-card, .skill-card";
/// Elements revealed when scrolled into view.
pub const REVEAL_SELECTOR: &str = ".reveal";
/// Id of the cursor glow element.
pub const CURSOR_GLOW_ID: &str = "cursor-glow";
/// Id of the profile image.
pub const PROFILE_IMAGE_ID: &str = "profile-img";
/// Image shown when the profile image fails to load.
pub const PROFILE_PLACEHOLDER: &str = "assets/profile-placeholder.svg";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Listeners, observers and loops backing the page effects.
///
/// Dropping it (or calling [`teardown`](Self::teardown)) detaches them.
#[derive(Debug, Default)]
pub struct PageEffects {
    listeners: Vec<EventListener>,
    reveal: Option<(IntersectionObserver, ObserverCallback)>,
    glow: Option<RafLoop>,
}

impl PageEffects {
    /// Wires every effect whose elements are present in `document`.
    #[must_use]
    pub fn install(window: &Window, document: &Document, reduced_motion: bool) -> Self {
        let mut effects = Self::default();
        effects.install_cards(document);
        effects.install_reveal(document, reduced_motion);
        effects.install_glow(window, document, reduced_motion);
        effects.install_image_fallback(document);
        effects
    }

    /// Detaches every listener, disconnects the reveal observer and stops
    /// the glow loop.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        if let Some((observer, _)) = self.reveal.take() {
            observer.disconnect();
        }
        self.glow = None;
    }

    fn install_cards(&mut self, document: &Document) {
        for card in select_all::<HtmlElement>(document, CARD_SELECTOR) {
            self.listeners.extend(EventListener::attach(&card, "mousemove", {
                let card = card.clone();
                move |event: Event| {
                    let Some(client) = client_point(&event) else {
                        return;
                    };
                    let rect = element_rect(&card);
                    let tilt = Tilt::toward(client, rect);
                    let shine = shine_offset(client, rect);
                    let style = card.style();
                    let _ = style.set_property("transform", &tilt.to_css());
                    let _ = style.set_property("--mx", &format!("{}px", shine.x));
                    let _ = style.set_property("--my", &format!("{}px", shine.y));
                }
            }));
            self.listeners.extend(EventListener::attach(&card, "mouseleave", {
                let card = card.clone();
                move |_| {
                    let _ = card.style().set_property("transform", &Tilt::REST.to_css());
                }
            }));
        }
    }

    fn install_reveal(&mut self, document: &Document, reduced_motion: bool) {
        let targets = select_all::<Element>(document, REVEAL_SELECTOR);
        if targets.is_empty() {
            return;
        }
        if reduced_motion {
            for target in &targets {
                let _ = target.class_list().add_1(REVEALED_CLASS);
            }
            return;
        }

        let reveal = |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    let target = entry.target();
                    let _ = target.class_list().add_1(REVEALED_CLASS);
                    observer.unobserve(&target);
                }
            }
        };
        let callback: ObserverCallback = Closure::new(reveal);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&REVEAL_THRESHOLD.into());
        options.set_root_margin(REVEAL_ROOT_MARGIN);
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                for target in &targets {
                    observer.observe(target);
                }
                self.reveal = Some((observer, callback));
            }
            Err(err) => {
                log::warn!("scroll reveal unavailable ({err:?}); revealing everything");
                for target in &targets {
                    let _ = target.class_list().add_1(REVEALED_CLASS);
                }
            }
        }
    }

    fn install_glow(&mut self, window: &Window, document: &Document, reduced_motion: bool) {
        let Some(glow_el) = document
            .get_element_by_id(CURSOR_GLOW_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        let origin = Point::new(
            window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0) / 2.0,
            window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(0.0) / 2.0,
        );
        let glow = Rc::new(RefCell::new(CursorGlow::new(origin, reduced_motion)));
        place(&glow_el, origin);

        self.listeners.extend(EventListener::attach(window, "pointermove", {
            let glow = Rc::clone(&glow);
            let glow_el = glow_el.clone();
            move |event: Event| {
                let Some(client) = client_point(&event) else {
                    return;
                };
                let mut glow = glow.borrow_mut();
                glow.set_target(client);
                if glow.is_instant() {
                    place(&glow_el, glow.position());
                }
            }
        }));

        if !reduced_motion {
            let raf = RafLoop::new(move |_| {
                let position = glow.borrow_mut().step();
                place(&glow_el, position);
            });
            raf.start();
            self.glow = Some(raf);
        }
    }

    fn install_image_fallback(&mut self, document: &Document) {
        let Some(img) = document
            .get_element_by_id(PROFILE_IMAGE_ID)
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        let _ = img.set_attribute("loading", "lazy");
        self.listeners.extend(EventListener::attach(&img, "error", {
            let img = img.clone();
            move |_| {
                // The placeholder failing too must not loop.
                if !img.src().ends_with(PROFILE_PLACEHOLDER) {
                    img.set_src(PROFILE_PLACEHOLDER);
                }
            }
        }));
    }
}

impl Drop for PageEffects {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn select_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("invalid selector `{selector}`");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

fn client_point(event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point::new(
        f64::from(mouse.client_x()),
        f64::from(mouse.client_y()),
    ))
}

fn element_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.right(), r.bottom())
}

fn place(el: &HtmlElement, p: Point) {
    let style = el.style();
    let _ = style.set_property("left", &format!("{}px", p.x));
    let _ = style.set_property("top", &format!("{}px", p.y));
}
