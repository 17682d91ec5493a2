// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::evaluate::Evaluation;
use strata_core::trace::{
    ContainerSource, InstanceEvent, ListenersEvent, PassSummary, PrepareEvent, PrepareSkip,
    PrepareSkipEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    passes: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, passes: 0 }
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn skip_reason(reason: PrepareSkip) -> &'static str {
    match reason {
        PrepareSkip::AlreadyPrepared => "already-prepared",
        PrepareSkip::NoParent => "no-parent",
        PrepareSkip::ContainerUnavailable => "container-unavailable",
    }
}

fn container_source(source: ContainerSource) -> &'static str {
    match source {
        ContainerSource::Created => "created",
        ContainerSource::Reused => "reused",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_prepare(&mut self, e: &PrepareEvent) {
        let _ = writeln!(
            self.writer,
            "[prepare] instance={} direction={} container={}",
            e.instance.index(),
            e.direction.as_str(),
            container_source(e.container),
        );
    }

    fn on_prepare_skip(&mut self, e: &PrepareSkipEvent) {
        let _ = writeln!(
            self.writer,
            "[skip] element={} reason={}",
            e.document_index,
            skip_reason(e.reason),
        );
    }

    fn on_listeners_attached(&mut self, e: &ListenersEvent) {
        let _ = writeln!(self.writer, "[listeners] instances={}", e.instances);
    }

    fn on_pass(&mut self, s: &PassSummary) {
        self.passes += 1;
        let _ = writeln!(
            self.writer,
            "[pass] #{} trigger={} instances={} displaced={} gated={} offscreen={}",
            self.passes,
            s.trigger.as_str(),
            s.instances,
            s.displaced,
            s.gated,
            s.offscreen,
        );
    }

    fn on_instance(&mut self, e: &InstanceEvent) {
        let _ = match e.evaluation {
            Evaluation::Gated => writeln!(self.writer, "[instance] {} gated", e.instance.index()),
            Evaluation::Offscreen => {
                writeln!(self.writer, "[instance] {} offscreen", e.instance.index())
            }
            Evaluation::Displaced(t) => {
                writeln!(self.writer, "[instance] {} transform={t}", e.instance.index())
            }
        };
    }
}
