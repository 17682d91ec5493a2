// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot `requestAnimationFrame` and `setTimeout` callbacks.
//!
//! Both wrappers own a persistent JS closure and re-submit it on demand, so a
//! scroll burst or a resize burst never allocates a new closure per event.
//! Coalescing decisions (whether to request at all) belong to the engine's
//! scheduler; these types only talk to the browser.

use alloc::boxed::Box;
use core::cell::Cell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use strata_core::time::{Duration, HostTime};

// Global bindings; no `Window` lookup per call.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, millis: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// A reusable `requestAnimationFrame` callback.
pub struct FrameRequest {
    closure: Closure<dyn FnMut(f64)>,
}

impl FrameRequest {
    /// Wraps `callback`, which receives the frame timestamp.
    pub fn new(mut callback: impl FnMut(HostTime) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            callback(HostTime::from_millis_f64(timestamp_ms));
        }) as Box<dyn FnMut(f64)>);
        Self { closure }
    }

    /// Schedules the callback for the next animation frame.
    pub fn request(&self) {
        let _ = request_animation_frame(self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for FrameRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrameRequest").finish_non_exhaustive()
    }
}

/// A reusable `setTimeout` callback with at most one pending timer.
pub struct Timeout {
    closure: Closure<dyn FnMut()>,
    id: Cell<Option<i32>>,
}

impl Timeout {
    /// Wraps `callback`.
    pub fn new(callback: impl FnMut() + 'static) -> Self {
        Self {
            closure: Closure::wrap(Box::new(callback) as Box<dyn FnMut()>),
            id: Cell::new(None),
        }
    }

    /// Cancels any pending timer and schedules the callback after `delay`.
    pub fn arm(&self, delay: Duration) {
        self.cancel();
        let id = set_timeout(self.closure.as_ref().unchecked_ref(), timeout_millis(delay));
        self.id.set(Some(id));
    }

    /// Cancels the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(id) = self.id.take() {
            clear_timeout(id);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for Timeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timeout")
            .field("id", &self.id.get())
            .finish_non_exhaustive()
    }
}

/// Whole milliseconds for `setTimeout`, rounded up so a timer never fires
/// before its deadline.
pub(crate) fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.micros().div_ceil(1000)).unwrap_or(i32::MAX)
}
