// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for parallax.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`RafScheduler`]: the controller's `requestAnimationFrame` scheduler
//! - [`RafLoop`]: a free-running `requestAnimationFrame` loop
//! - [`DomContainer`]: the hero container as a [`Container`](parallax_core::host::Container)
//! - [`WebGlRenderer`]: WebGL2 drawing of the scene
//! - [`init_hero`] / [`WebHero`]: listener wiring for the centerpiece
//! - [`PageEffects`]: card tilt and shine, scroll reveal, cursor glow, image
//!   fallback
//! - [`ConsoleLogger`]: a `log` backend for the browser console
//!
//! [`init_page`] ties them together for a page laid out the usual way.

#![no_std]
// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

mod binding;
mod container;
mod effects;
mod listener;
mod logger;
mod raf;
mod webgl;

pub use binding::{REDUCED_MOTION_QUERY, WebHero, init_hero, prefers_reduced_motion};
pub use container::DomContainer;
pub use effects::{
    CARD_SELECTOR, CURSOR_GLOW_ID, PROFILE_IMAGE_ID, PROFILE_PLACEHOLDER, PageEffects,
    REVEAL_SELECTOR,
};
pub use logger::ConsoleLogger;
pub use raf::{RafHandle, RafLoop, RafScheduler, now};
pub use webgl::WebGlRenderer;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use parallax_core::config::HeroConfig;

/// Id of the hero container element.
pub const HERO_CONTAINER_ID: &str = "hero-3d";

/// Attribute naming one of the [`HeroConfig::preset`]s.
pub const PRESET_ATTRIBUTE: &str = "data-hero-preset";

/// Attribute holding a JSON [`HeroConfig`]; omitted fields take the default
/// torus knot values.
pub const CONFIG_ATTRIBUTE: &str = "data-hero-config";

/// Reads the hero configuration from the container's attributes.
///
/// `data-hero-config` wins over `data-hero-preset`. A malformed or
/// out-of-range override and an unknown preset name are logged and skipped,
/// as in [`HeroConfig::resolve`], so the result always validates.
#[must_use]
pub fn read_config(element: &HtmlElement) -> HeroConfig {
    let json = element.get_attribute(CONFIG_ATTRIBUTE);
    let preset = element.get_attribute(PRESET_ATTRIBUTE);
    HeroConfig::resolve(json.as_deref(), preset.as_deref())
}

/// Everything [`init_page`] started.
///
/// Held by the page; [`teardown`](Self::teardown) detaches it all.
#[wasm_bindgen]
#[derive(Debug)]
pub struct Page {
    hero: Option<WebHero>,
    effects: PageEffects,
}

#[wasm_bindgen]
impl Page {
    /// Detaches every listener and stops every loop.
    pub fn teardown(&mut self) {
        if let Some(hero) = self.hero.as_mut() {
            hero.teardown();
        }
        self.effects.teardown();
    }

    /// Whether the hero centerpiece is animating.
    #[wasm_bindgen(getter, js_name = heroRunning)]
    pub fn hero_running(&self) -> bool {
        self.hero.as_ref().is_some_and(WebHero::is_running)
    }
}

/// Starts the page effects and the hero centerpiece.
///
/// Call once the DOM is ready. A missing hero container or WebGL2 support
/// leaves the hero out; the rest of the page still gets its effects.
pub fn init_page() -> Result<Page, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let reduced_motion = prefers_reduced_motion(&window);
    let effects = PageEffects::install(&window, &document, reduced_motion);

    let config = document
        .get_element_by_id(HERO_CONTAINER_ID)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .map(|el| read_config(&el))
        .unwrap_or_default();
    let hero = match init_hero(HERO_CONTAINER_ID, &config) {
        Ok(hero) => Some(hero),
        Err(err) => {
            log::warn!("hero centerpiece disabled: {err}");
            None
        }
    };

    Ok(Page { hero, effects })
}
