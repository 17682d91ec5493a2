// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine: registry, preparer, evaluator and scheduler wired together.
//!
//! [`Parallax`] is driven entirely by its backend. Every entry point runs
//! synchronously to completion, so a preparation run (including its initial
//! pass) always finishes before any later pass reads the registry.
//!
//! ```rust,ignore
//! // document ready, framework ready, or inserted targets detected:
//! let report = engine.init(&mut doc, &mut Tracer::none());
//! if report.attach_listeners {
//!     backend.listen_scroll_and_resize();
//! }
//!
//! // scroll listener:
//! if engine.on_scroll() {
//!     backend.request_frame();
//! }
//! // frame callback:
//! engine.on_frame(&mut doc, &mut Tracer::none());
//!
//! // resize listener:
//! let deadline = engine.on_resize(now());
//! backend.rearm_timer(deadline);
//! // timer callback:
//! engine.on_resize_timer(&mut doc, now(), &mut Tracer::none());
//! ```

use alloc::format;

use crate::backend::{HostDocument, LayoutHost};
use crate::config::Settings;
use crate::evaluate::{Evaluation, evaluate_with};
use crate::prepare::Preparer;
use crate::registry::Registry;
use crate::scheduler::Scheduler;
use crate::time::HostTime;
#[cfg(feature = "trace-rich")]
use crate::trace::InstanceEvent;
use crate::trace::{
    ListenersEvent, PassSummary, PassTrigger, PrepareEvent, PrepareSkip, PrepareSkipEvent, Tracer,
};

/// Result of one preparation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitReport {
    /// Targets prepared and registered by this run.
    pub prepared: usize,
    /// Marked elements skipped because they were already tracked.
    pub already_prepared: usize,
    /// Marked elements that could not be prepared.
    pub failed: usize,
    /// `true` exactly once per engine: the backend must now attach its scroll
    /// and resize listeners.
    pub attach_listeners: bool,
    /// The synchronous pass that ended the run.
    pub pass: PassSummary,
}

/// Scroll-driven parallax engine over host elements of type `E`.
#[derive(Debug)]
pub struct Parallax<E> {
    preparer: Preparer,
    registry: Registry<E>,
    scheduler: Scheduler,
}

impl<E: Clone + PartialEq> Parallax<E> {
    /// Creates an engine with an empty registry.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            scheduler: Scheduler::new(settings.resize_quiet_period),
            preparer: Preparer::new(settings),
            registry: Registry::new(),
        }
    }

    /// The engine settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.preparer.settings()
    }

    /// The tracked instances.
    #[must_use]
    pub fn registry(&self) -> &Registry<E> {
        &self.registry
    }

    /// The coalescing state.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Number of tracked instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no target has been prepared yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Whether any of the `marked` elements still needs preparing.
    ///
    /// Hosts that watch for inserted content use this to tell new targets
    /// apart from containers that preparation itself inserted around
    /// tracked ones.
    #[must_use]
    pub fn has_untracked<'a>(&self, marked: impl IntoIterator<Item = &'a E>) -> bool
    where
        E: 'a,
    {
        marked.into_iter().any(|el| !self.registry.contains(el))
    }

    /// Prepares every marked element not yet tracked, in document order, then
    /// runs one pass over all instances.
    ///
    /// Safe to call any number of times: tracked elements are skipped and
    /// listeners are requested only once.
    pub fn init<D>(&mut self, doc: &mut D, tracer: &mut Tracer<'_>) -> InitReport
    where
        D: HostDocument<Element = E>,
    {
        let marker = self.settings().marker_attribute;
        let mut prepared = 0;
        let mut already_prepared = 0;
        let mut failed = 0;

        for (document_index, element) in doc.marked_elements(marker).iter().enumerate() {
            if self.registry.contains(element) {
                already_prepared += 1;
                tracer.prepare_skip(&PrepareSkipEvent {
                    document_index,
                    reason: PrepareSkip::AlreadyPrepared,
                });
                continue;
            }
            match self.preparer.prepare(doc, element) {
                Ok(p) => {
                    let direction = p.instance.config.direction;
                    let instance = self.registry.register(p.instance);
                    prepared += 1;
                    tracer.prepare(&PrepareEvent {
                        instance,
                        direction,
                        container: p.container_source,
                    });
                }
                Err(reason) => {
                    failed += 1;
                    tracer.prepare_skip(&PrepareSkipEvent {
                        document_index,
                        reason,
                    });
                }
            }
        }

        let attach_listeners = !self.registry.is_empty() && self.scheduler.attach_listeners_once();
        if attach_listeners {
            tracer.listeners_attached(&ListenersEvent {
                instances: self.registry.len(),
            });
        }

        let pass = self.run_pass(doc, PassTrigger::Init, tracer);
        InitReport {
            prepared,
            already_prepared,
            failed,
            attach_listeners,
            pass,
        }
    }

    /// Runs one pass immediately, e.g. after a layout change that produced
    /// neither a scroll nor a resize event.
    pub fn update<D>(&mut self, doc: &mut D, tracer: &mut Tracer<'_>) -> PassSummary
    where
        D: LayoutHost<Element = E>,
    {
        self.run_pass(doc, PassTrigger::Manual, tracer)
    }

    /// Records a scroll event. Returns `true` when the backend must request
    /// a frame.
    pub fn on_scroll(&mut self) -> bool {
        self.scheduler.on_scroll()
    }

    /// Frame callback. Runs a pass if a scroll requested this frame.
    pub fn on_frame<D>(&mut self, doc: &mut D, tracer: &mut Tracer<'_>) -> Option<PassSummary>
    where
        D: LayoutHost<Element = E>,
    {
        self.scheduler
            .on_frame()
            .then(|| self.run_pass(doc, PassTrigger::Scroll, tracer))
    }

    /// Records a resize event at `now` and returns the deadline the backend's
    /// timer must be (re)armed for.
    pub fn on_resize(&mut self, now: HostTime) -> HostTime {
        self.scheduler.on_resize(now)
    }

    /// Resize timer callback. Runs a pass if the quiet period has elapsed
    /// since the last resize event.
    pub fn on_resize_timer<D>(
        &mut self,
        doc: &mut D,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Option<PassSummary>
    where
        D: LayoutHost<Element = E>,
    {
        self.scheduler
            .on_resize_timer(now)
            .then(|| self.run_pass(doc, PassTrigger::Resize, tracer))
    }

    fn run_pass<D>(&self, doc: &mut D, trigger: PassTrigger, tracer: &mut Tracer<'_>) -> PassSummary
    where
        D: LayoutHost<Element = E>,
    {
        let settings = self.settings();
        let viewport = doc.viewport();
        let mut summary = PassSummary::new(trigger);

        for (_id, instance) in self.registry.iter() {
            let evaluation = evaluate_with(
                settings,
                &instance.config,
                &instance.overscan,
                viewport,
                || doc.bounding_rect(&instance.container),
            );
            summary.instances += 1;
            match evaluation {
                Evaluation::Gated => summary.gated += 1,
                Evaluation::Offscreen => summary.offscreen += 1,
                Evaluation::Displaced(_) => summary.displaced += 1,
            }
            if let Some(transform) = evaluation.transform() {
                doc.set_style(&instance.element, "transform", &format!("{transform}"));
            }
            #[cfg(feature = "trace-rich")]
            tracer.instance(&InstanceEvent {
                instance: _id,
                evaluation,
            });
        }

        tracer.pass(&summary);
        summary
    }
}
