// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace events on the browser console.

use alloc::format;
use alloc::string::String;

use wasm_bindgen::prelude::*;

use strata_core::trace::{
    ContainerSource, ListenersEvent, PassSummary, PrepareEvent, PrepareSkip, PrepareSkipEvent,
    TraceSink,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = "debug")]
    pub(crate) fn console_debug(message: &str);
}

/// A [`TraceSink`] that writes one `console.debug` line per event.
///
/// Events only reach the sink when the crate is built with the `trace`
/// feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

pub(crate) fn prepare_line(e: &PrepareEvent) -> String {
    let container = match e.container {
        ContainerSource::Created => "new container",
        ContainerSource::Reused => "existing container",
    };
    format!(
        "[strata] prepared #{} ({}, {container})",
        e.instance.index(),
        e.direction.as_str(),
    )
}

pub(crate) fn skip_line(e: &PrepareSkipEvent) -> String {
    let reason = match e.reason {
        PrepareSkip::AlreadyPrepared => "already prepared",
        PrepareSkip::NoParent => "no parent element",
        PrepareSkip::ContainerUnavailable => "could not create container",
    };
    format!("[strata] skipped marked element {}: {reason}", e.document_index)
}

pub(crate) fn pass_line(s: &PassSummary) -> String {
    format!(
        "[strata] {} pass: {} instances, {} moved, {} reset, {} off-screen",
        s.trigger.as_str(),
        s.instances,
        s.displaced,
        s.gated,
        s.offscreen,
    )
}

impl TraceSink for ConsoleSink {
    fn on_prepare(&mut self, e: &PrepareEvent) {
        console_debug(&prepare_line(e));
    }

    fn on_prepare_skip(&mut self, e: &PrepareSkipEvent) {
        // Re-runs skip every tracked element; only real failures are news.
        if e.reason != PrepareSkip::AlreadyPrepared {
            console_debug(&skip_line(e));
        }
    }

    fn on_listeners_attached(&mut self, e: &ListenersEvent) {
        console_debug(&format!(
            "[strata] listening for scroll and resize ({} instances)",
            e.instances
        ));
    }

    fn on_pass(&mut self, s: &PassSummary) {
        console_debug(&pass_line(s));
    }
}
