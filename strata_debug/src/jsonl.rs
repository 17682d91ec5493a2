// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON Lines trace output.
//!
//! [`JsonLinesSink`] writes every event as a single-line JSON object with an
//! `"event"` discriminator, so a session can be filtered with
//! `jq 'select(.event == "pass")'`.
//!
//! ```json
//! {"event":"prepare","instance":0,"direction":"vertical","container":"created"}
//! {"event":"pass","trigger":"init","instances":1,"displaced":1,"gated":0,"offscreen":0}
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::evaluate::Evaluation;
use strata_core::trace::{
    ContainerSource, InstanceEvent, ListenersEvent, PassSummary, PrepareEvent, PrepareSkip,
    PrepareSkipEvent, TraceSink,
};
use strata_core::transform::ParallaxTransform;

/// Writes one JSON object per event to a [`Write`] destination.
///
/// Write errors are remembered rather than surfaced from the sink methods;
/// check [`JsonLinesSink::finish`].
pub struct JsonLinesSink<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flushes the writer and returns it, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn emit(&mut self, value: &Value) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, value)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}

fn skip_reason(reason: PrepareSkip) -> &'static str {
    match reason {
        PrepareSkip::AlreadyPrepared => "already-prepared",
        PrepareSkip::NoParent => "no-parent",
        PrepareSkip::ContainerUnavailable => "container-unavailable",
    }
}

fn transform_json(t: &ParallaxTransform) -> Value {
    match *t {
        ParallaxTransform::Identity => json!({ "kind": "identity" }),
        ParallaxTransform::TranslateY { px } => json!({ "kind": "translate-y", "px": px }),
        ParallaxTransform::ScaleTranslateX { scale, x_percent } => json!({
            "kind": "scale-translate-x",
            "scale": scale,
            "x_percent": x_percent,
        }),
        ParallaxTransform::ScaleTranslate {
            scale,
            x_percent,
            y_percent,
        } => json!({
            "kind": "scale-translate",
            "scale": scale,
            "x_percent": x_percent,
            "y_percent": y_percent,
        }),
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_prepare(&mut self, e: &PrepareEvent) {
        let container = match e.container {
            ContainerSource::Created => "created",
            ContainerSource::Reused => "reused",
        };
        self.emit(&json!({
            "event": "prepare",
            "instance": e.instance.index(),
            "direction": e.direction.as_str(),
            "container": container,
        }));
    }

    fn on_prepare_skip(&mut self, e: &PrepareSkipEvent) {
        self.emit(&json!({
            "event": "skip",
            "element": e.document_index,
            "reason": skip_reason(e.reason),
        }));
    }

    fn on_listeners_attached(&mut self, e: &ListenersEvent) {
        self.emit(&json!({
            "event": "listeners",
            "instances": e.instances,
        }));
    }

    fn on_pass(&mut self, s: &PassSummary) {
        self.emit(&json!({
            "event": "pass",
            "trigger": s.trigger.as_str(),
            "instances": s.instances,
            "displaced": s.displaced,
            "gated": s.gated,
            "offscreen": s.offscreen,
        }));
    }

    fn on_instance(&mut self, e: &InstanceEvent) {
        let (outcome, transform) = match &e.evaluation {
            Evaluation::Gated => ("gated", Value::Null),
            Evaluation::Offscreen => ("offscreen", Value::Null),
            Evaluation::Displaced(t) => ("displaced", transform_json(t)),
        };
        self.emit(&json!({
            "event": "instance",
            "instance": e.instance.index(),
            "outcome": outcome,
            "transform": transform,
        }));
    }
}
