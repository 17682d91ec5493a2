// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for strata.
//!
//! This crate connects [`strata_core`] to the DOM:
//!
//! - [`DomDocument`]: the live document as a
//!   [`HostDocument`](strata_core::backend::HostDocument)
//! - [`FrameRequest`] / [`Timeout`]: reusable `requestAnimationFrame` and
//!   `setTimeout` callbacks
//! - [`ParallaxHandle`]: an engine wired to document ready, scroll, resize,
//!   inserted content and framework readiness
//! - [`ConsoleSink`]: trace events on `console.debug` (`trace` feature)
//!
//! When loaded as a wasm module, [`start`] runs automatically: it prepares
//! every `[data-parallax]` element once the document is parsed and publishes
//! the handle as `window.strataParallax`.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

mod console;
mod dom;
mod raf;
mod runtime;

use alloc::string::String;

use wasm_bindgen::prelude::*;

pub use console::ConsoleSink;
pub use dom::DomDocument;
pub use raf::{FrameRequest, Timeout};
pub use runtime::{GLOBAL_NAME, ParallaxHandle};
pub use strata_core::config::Settings;

use strata_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(raf::performance_now())
}

/// The library version.
#[wasm_bindgen]
#[must_use]
pub fn version() -> String {
    String::from(strata_core::VERSION)
}

/// Installs the engine with default [`Settings`], publishes its handle on
/// `window` and prepares the document as soon as it is parsed.
///
/// Outside a browser window this does nothing.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    let Some(handle) = ParallaxHandle::install(Settings::new()) else {
        return Ok(());
    };
    handle.publish(GLOBAL_NAME)?;
    handle.run_when_ready()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_core() {
        assert_eq!(version(), strata_core::VERSION);
        assert!(!version().is_empty());
    }

    #[test]
    fn global_name_is_a_js_identifier() {
        assert!(
            GLOBAL_NAME
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        );
        assert!(!GLOBAL_NAME.starts_with(|c: char| c.is_ascii_digit()));
    }
}
