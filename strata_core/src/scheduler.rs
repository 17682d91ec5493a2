// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event coalescing for evaluation passes.
//!
//! The [`Scheduler`] decides *whether* a pass should run; the backend decides
//! *when* by owning the actual frame request and timer. Two independent paths
//! exist:
//!
//! - **Scroll**: at most one pass per rendered frame. The first scroll event
//!   after a pass asks the backend to request a frame; further scroll events
//!   are absorbed until that frame runs. See [`FrameGate`].
//! - **Resize**: at most one pass per burst. Every resize event restarts a
//!   quiet-period timer; the pass runs once the timer expires without being
//!   restarted. See [`ResizeDebounce`].
//!
//! The scheduler also latches listener registration so repeated
//! initialization never attaches the scroll and resize listeners twice.

use crate::time::{Duration, HostTime};

/// "A pass is pending" guard for the scroll path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Creates a gate with no pass pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: false }
    }

    /// Records a scroll event.
    ///
    /// Returns `true` when the caller must request a frame; `false` when one
    /// is already pending.
    pub fn request(&mut self) -> bool {
        !core::mem::replace(&mut self.pending, true)
    }

    /// Consumes the pending request at frame time.
    ///
    /// Returns `true` if a pass should run.
    pub fn take(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }

    /// Whether a frame has been requested and not yet run.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Quiet-period debounce for the resize path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeDebounce {
    quiet_period: Duration,
    deadline: Option<HostTime>,
}

impl ResizeDebounce {
    /// Creates a debounce that fires `quiet_period` after the last event.
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Records a resize event at `now`, restarting the quiet period.
    ///
    /// Returns the new deadline; the backend should cancel any timer it armed
    /// for a previous deadline.
    pub fn restart(&mut self, now: HostTime) -> HostTime {
        let deadline = now.checked_add(self.quiet_period).unwrap_or(now);
        self.deadline = Some(deadline);
        deadline
    }

    /// Returns `true` exactly once, at or after the current deadline.
    pub fn poll(&mut self, now: HostTime) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// The armed deadline, if a burst is in progress.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.deadline
    }

    /// The configured quiet period.
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}

/// Coalesces scroll and resize events into evaluation passes.
#[derive(Debug)]
pub struct Scheduler {
    frame: FrameGate,
    resize: ResizeDebounce,
    listeners_attached: bool,
}

impl Scheduler {
    /// Creates a scheduler with the given resize quiet period.
    #[must_use]
    pub const fn new(resize_quiet_period: Duration) -> Self {
        Self {
            frame: FrameGate::new(),
            resize: ResizeDebounce::new(resize_quiet_period),
            listeners_attached: false,
        }
    }

    /// See [`FrameGate::request`].
    pub fn on_scroll(&mut self) -> bool {
        self.frame.request()
    }

    /// See [`FrameGate::take`].
    pub fn on_frame(&mut self) -> bool {
        self.frame.take()
    }

    /// See [`ResizeDebounce::restart`].
    pub fn on_resize(&mut self, now: HostTime) -> HostTime {
        self.resize.restart(now)
    }

    /// See [`ResizeDebounce::poll`].
    pub fn on_resize_timer(&mut self, now: HostTime) -> bool {
        self.resize.poll(now)
    }

    /// Latches listener registration.
    ///
    /// Returns `true` the first time it is called and `false` afterwards.
    pub fn attach_listeners_once(&mut self) -> bool {
        !core::mem::replace(&mut self.listeners_attached, true)
    }

    /// Whether listeners have been attached.
    #[must_use]
    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    /// Whether a scroll-driven frame is pending.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame.is_pending()
    }

    /// The armed resize deadline, if any.
    #[must_use]
    pub fn resize_deadline(&self) -> Option<HostTime> {
        self.resize.deadline()
    }
}
