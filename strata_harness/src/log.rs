// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`TraceSink`] that keeps every event for later assertions.

use alloc::vec::Vec;

use strata_core::trace::{
    InstanceEvent, ListenersEvent, PassSummary, PrepareEvent, PrepareSkipEvent, TraceSink,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoggedEvent {
    /// See [`TraceSink::on_prepare`].
    Prepare(PrepareEvent),
    /// See [`TraceSink::on_prepare_skip`].
    PrepareSkip(PrepareSkipEvent),
    /// See [`TraceSink::on_listeners_attached`].
    Listeners(ListenersEvent),
    /// See [`TraceSink::on_pass`].
    Pass(PassSummary),
    /// See [`TraceSink::on_instance`].
    Instance(InstanceEvent),
}

/// Records events in arrival order.
#[derive(Debug, Default)]
pub struct EventLog {
    /// Recorded events, oldest first.
    pub events: Vec<LoggedEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded pass summaries, oldest first.
    pub fn passes(&self) -> impl Iterator<Item = &PassSummary> {
        self.events.iter().filter_map(|e| match e {
            LoggedEvent::Pass(s) => Some(s),
            _ => None,
        })
    }

    /// Recorded skip events, oldest first.
    pub fn skips(&self) -> impl Iterator<Item = &PrepareSkipEvent> {
        self.events.iter().filter_map(|e| match e {
            LoggedEvent::PrepareSkip(s) => Some(s),
            _ => None,
        })
    }

    /// Number of listener-attach events.
    #[must_use]
    pub fn listener_attachments(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, LoggedEvent::Listeners(_)))
            .count()
    }

    /// Forgets all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for EventLog {
    fn on_prepare(&mut self, e: &PrepareEvent) {
        self.events.push(LoggedEvent::Prepare(*e));
    }

    fn on_prepare_skip(&mut self, e: &PrepareSkipEvent) {
        self.events.push(LoggedEvent::PrepareSkip(*e));
    }

    fn on_listeners_attached(&mut self, e: &ListenersEvent) {
        self.events.push(LoggedEvent::Listeners(*e));
    }

    fn on_pass(&mut self, s: &PassSummary) {
        self.events.push(LoggedEvent::Pass(*s));
    }

    fn on_instance(&mut self, e: &InstanceEvent) {
        self.events.push(LoggedEvent::Instance(*e));
    }
}
