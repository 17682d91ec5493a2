// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for driving a Strata engine without a browser.
//!
//! - [`FakeDocument`]: an in-memory element tree implementing
//!   [`HostDocument`](strata_core::backend::HostDocument), with scripted
//!   viewport, scroll offset and element rectangles.
//! - [`EventLog`]: a [`TraceSink`](strata_core::trace::TraceSink) that keeps
//!   every event.

#![no_std]

extern crate alloc;

mod document;
mod log;

pub use document::{FakeDocument, NodeId};
pub use log::{EventLog, LoggedEvent};
