// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core of a scroll-driven parallax effect for image elements.
//!
//! `strata_core` maps a target element's position in the viewport to a 2-D
//! transform, keeps that mapping live during scrolling and resizing, and
//! prepares targets so the mapping never exposes empty container space. It is
//! `no_std` compatible (with `alloc`) and knows nothing about any particular
//! document implementation: backends provide one through the traits in
//! [`backend`].
//!
//! # Architecture
//!
//! ```text
//!   trigger (ready / framework ready / inserted targets)
//!       │
//!       ▼
//!   Parallax::init() ──► Preparer::prepare() ──► Registry::register()
//!       │
//!       ▼
//!   pass ◄── Parallax::on_frame()        ◄── FrameGate      ◄── scroll
//!        ◄── Parallax::on_resize_timer() ◄── ResizeDebounce ◄── resize
//!        ◄── Parallax::update()
//!       │
//!       ▼
//!   evaluate() per instance ──► LayoutHost::set_style("transform", …)
//! ```
//!
//! **[`config`]**: [`Settings`](config::Settings) and per-target
//! [`TargetConfig`](config::TargetConfig) with attribute parsing that always
//! falls back to defaults.
//!
//! **[`prepare`]**: Wraps targets in clipping containers and sizes them for
//! overscan.
//!
//! **[`overscan`]**: The sizing contract shared by preparation and
//! evaluation.
//!
//! **[`evaluate`]**: Breakpoint gate, visibility gate, scroll progress and
//! per-direction displacement.
//!
//! **[`transform`]**: The transform value and its CSS serialization.
//!
//! **[`scheduler`]**: Frame coalescing for scroll, quiet-period debounce for
//! resize, and the one-time listener latch.
//!
//! **[`registry`]**: Append-only tracked-instance storage, doubling as the
//! prepared-element side-table.
//!
//! **[`engine`]**: [`Parallax`](engine::Parallax), which wires the above
//! together behind the entry points a backend calls.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-instance
//!   evaluation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod config;
pub mod engine;
pub mod evaluate;
pub mod overscan;
pub mod prepare;
pub mod registry;
pub mod scheduler;
pub mod time;
pub mod trace;
pub mod transform;

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
