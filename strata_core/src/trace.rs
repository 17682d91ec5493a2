// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for preparation and evaluation passes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls as it prepares targets and runs passes. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-instance
//!   [`InstanceEvent`] and the corresponding `TraceSink` method.

use crate::config::Direction;
#[cfg(feature = "trace-rich")]
use crate::evaluate::Evaluation;
use crate::registry::InstanceId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What caused an evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassTrigger {
    /// The synchronous pass at the end of a preparation run.
    Init,
    /// A coalesced scroll frame.
    Scroll,
    /// The end of a resize burst.
    Resize,
    /// An explicit update request.
    Manual,
}

impl PassTrigger {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::Manual => "manual",
        }
    }
}

/// Where a prepared target's container came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerSource {
    /// A new container was inserted around the target.
    Created,
    /// The target's parent already was a container.
    Reused,
}

/// Why a marked element was not prepared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrepareSkip {
    /// The element is already tracked.
    AlreadyPrepared,
    /// The element has no parent to host a container.
    NoParent,
    /// The host could not create a container element.
    ContainerUnavailable,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for each newly tracked target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareEvent {
    /// Handle of the new instance.
    pub instance: InstanceId,
    /// Configured direction.
    pub direction: Direction,
    /// Whether a container was created or reused.
    pub container: ContainerSource,
}

/// Emitted for each marked element that a preparation run skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareSkipEvent {
    /// Position of the element among the marked elements, in document order.
    pub document_index: usize,
    /// Why the element was skipped.
    pub reason: PrepareSkip,
}

/// Emitted once, when scroll and resize listeners are first requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenersEvent {
    /// Number of tracked instances at that moment.
    pub instances: usize,
}

/// Per-instance evaluation result (requires `trace-rich` feature).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceEvent {
    /// Evaluated instance.
    pub instance: InstanceId,
    /// Outcome of the evaluation.
    pub evaluation: Evaluation,
}

/// Counts for one evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSummary {
    /// What caused the pass.
    pub trigger: PassTrigger,
    /// Instances visited.
    pub instances: usize,
    /// Instances that received a computed transform.
    pub displaced: usize,
    /// Instances that received the identity transform from a breakpoint gate.
    pub gated: usize,
    /// Instances left untouched because their container was off-screen.
    pub offscreen: usize,
}

impl PassSummary {
    /// An empty summary for a pass caused by `trigger`.
    #[must_use]
    pub const fn new(trigger: PassTrigger) -> Self {
        Self {
            trigger,
            instances: 0,
            displaced: 0,
            gated: 0,
            offscreen: 0,
        }
    }

    /// Number of style writes the pass performed.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.displaced + self.gated
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a target is prepared and registered.
    fn on_prepare(&mut self, e: &PrepareEvent) {
        _ = e;
    }

    /// Called when a marked element is skipped during preparation.
    fn on_prepare_skip(&mut self, e: &PrepareSkipEvent) {
        _ = e;
    }

    /// Called when the engine first asks the backend to attach listeners.
    fn on_listeners_attached(&mut self, e: &ListenersEvent) {
        _ = e;
    }

    /// Called at the end of every evaluation pass.
    fn on_pass(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called for each evaluated instance (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_instance(&mut self, e: &InstanceEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PrepareEvent`].
    #[inline]
    pub fn prepare(&mut self, e: &PrepareEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_prepare(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PrepareSkipEvent`].
    #[inline]
    pub fn prepare_skip(&mut self, e: &PrepareSkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_prepare_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ListenersEvent`].
    #[inline]
    pub fn listeners_attached(&mut self, e: &ListenersEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_listeners_attached(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits an [`InstanceEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn instance(&mut self, e: &InstanceEvent) {
        if let Some(s) = &mut self.sink {
            s.on_instance(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        let mut tracer = Tracer::new(&mut sink);
        tracer.pass(&PassSummary::new(PassTrigger::Manual));
        tracer.prepare_skip(&PrepareSkipEvent {
            document_index: 0,
            reason: PrepareSkip::NoParent,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.listeners_attached(&ListenersEvent { instances: 3 });
    }

    #[test]
    fn summary_counts_writes() {
        let mut s = PassSummary::new(PassTrigger::Scroll);
        s.instances = 5;
        s.displaced = 2;
        s.gated = 1;
        s.offscreen = 2;
        assert_eq!(s.writes(), 3);
        assert_eq!(s.trigger.as_str(), "scroll");
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        #[derive(Default)]
        struct CountingSink {
            passes: usize,
            prepared: usize,
        }

        impl TraceSink for CountingSink {
            fn on_pass(&mut self, _s: &PassSummary) {
                self.passes += 1;
            }

            fn on_prepare(&mut self, _e: &PrepareEvent) {
                self.prepared += 1;
            }
        }

        let mut sink = CountingSink::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.pass(&PassSummary::new(PassTrigger::Init));
            tracer.prepare(&PrepareEvent {
                instance: InstanceId(0),
                direction: Direction::Both,
                container: ContainerSource::Created,
            });
        }
        assert_eq!(sink.passes, 1);
        assert_eq!(sink.prepared, 1);
    }
}
