// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: the hero centerpiece and page effects driven by
//! `parallax_backend_web`.
//!
//! Build with: `wasm-pack build --target web demos/web_hero`
//!
//! Then serve `demos/web_hero/` and open `index.html` in a browser. The page
//! script calls [`start_page`] once the module is loaded and keeps the
//! returned [`Page`] alive.

#![no_std]

use wasm_bindgen::prelude::*;

use parallax_backend_web::{ConsoleLogger, Page, init_page};

/// Installs the console logger. Runs automatically when the module loads.
#[wasm_bindgen(start)]
pub fn main() {
    ConsoleLogger::install(log::LevelFilter::Info);
}

/// Starts the page effects and the hero centerpiece.
#[wasm_bindgen(js_name = startPage)]
pub fn start_page() -> Result<Page, JsValue> {
    init_page()
}
