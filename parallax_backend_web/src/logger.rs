// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`log`] backend that writes to the browser console.

use alloc::format;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Forwards `log` records to `console.error`/`warn`/`info`/`debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    /// Installs the console logger as the global `log` backend.
    ///
    /// Has no effect if a logger is already installed.
    pub fn install(max_level: LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(max_level);
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}
