// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser wiring: triggers, listeners, timers and the exposed handle.
//!
//! The engine itself never touches the browser. This module owns it together
//! with a [`DomDocument`] and connects it to:
//!
//! - document ready (`DOMContentLoaded`, or immediately if already parsed),
//! - `scroll` (passive) → one `requestAnimationFrame` per burst,
//! - `resize` → a `setTimeout` re-armed on every event,
//! - a `MutationObserver` that re-runs preparation when marked elements are
//!   inserted, after a settle delay,
//! - [`ParallaxHandle::on_framework_ready`], for frameworks that render after
//!   document ready.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Element, Event, HtmlElement, MutationObserver,
    MutationObserverInit, MutationRecord,
};

use strata_core::config::Settings;
use strata_core::engine::Parallax;
use strata_core::time::HostTime;
use strata_core::trace::Tracer;

use crate::console::{ConsoleSink, console_debug};
use crate::dom::{DomDocument, marker_selector};
use crate::raf::{FrameRequest, Timeout};

/// Property on `window` under which [`start`](crate::start) publishes the
/// handle.
pub const GLOBAL_NAME: &str = "strataParallax";

type MutationClosure = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

/// Engine, document and optional console tracing.
struct Runtime {
    engine: Parallax<HtmlElement>,
    doc: DomDocument,
    console: Option<ConsoleSink>,
}

impl Runtime {
    fn traced<R>(
        &mut self,
        f: impl FnOnce(&mut Parallax<HtmlElement>, &mut DomDocument, &mut Tracer<'_>) -> R,
    ) -> R {
        let Self {
            engine,
            doc,
            console,
        } = self;
        let mut tracer = match console {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        f(engine, doc, &mut tracer)
    }
}

struct Shared {
    runtime: RefCell<Runtime>,
    frame: FrameRequest,
    resize_timer: Timeout,
    init_timer: Timeout,
    observer: RefCell<Option<(MutationObserver, MutationClosure)>>,
}

impl Shared {
    fn new(settings: Settings, doc: DomDocument) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Self>| {
            let on_frame = weak.clone();
            let on_resize_timer = weak.clone();
            let on_init_timer = weak.clone();
            Self {
                runtime: RefCell::new(Runtime {
                    engine: Parallax::new(settings),
                    doc,
                    console: None,
                }),
                frame: FrameRequest::new(move |_timestamp| {
                    if let Some(shared) = on_frame.upgrade() {
                        shared
                            .runtime
                            .borrow_mut()
                            .traced(|engine, doc, tracer| engine.on_frame(doc, tracer));
                    }
                }),
                resize_timer: Timeout::new(move || {
                    if let Some(shared) = on_resize_timer.upgrade() {
                        shared.resize_settled();
                    }
                }),
                init_timer: Timeout::new(move || {
                    if let Some(shared) = on_init_timer.upgrade() {
                        shared.refresh();
                    }
                }),
                observer: RefCell::new(None),
            }
        })
    }

    fn settings(&self) -> Settings {
        *self.runtime.borrow().engine.settings()
    }

    fn refresh(self: &Rc<Self>) {
        let report = self
            .runtime
            .borrow_mut()
            .traced(|engine, doc, tracer| engine.init(doc, tracer));
        if report.attach_listeners {
            self.attach_listeners();
        }
    }

    fn update(&self) {
        self.runtime
            .borrow_mut()
            .traced(|engine, doc, tracer| engine.update(doc, tracer));
    }

    fn resize_settled(&self) {
        let now = crate::now();
        let rearm = {
            let mut runtime = self.runtime.borrow_mut();
            match runtime.traced(|engine, doc, tracer| engine.on_resize_timer(doc, now, tracer)) {
                Some(_) => None,
                // Fired a little before the deadline by the host clock.
                None => runtime.engine.scheduler().resize_deadline(),
            }
        };
        if let Some(deadline) = rearm {
            self.resize_timer.arm(deadline.saturating_duration_since(now));
        }
    }

    fn attach_listeners(self: &Rc<Self>) {
        let window = self.runtime.borrow().doc.window().clone();

        let weak = Rc::downgrade(self);
        let on_scroll = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade()
                && shared.runtime.borrow_mut().engine.on_scroll()
            {
                shared.frame.request();
            }
        }) as Box<dyn FnMut(Event)>);
        let passive = AddEventListenerOptions::new();
        passive.set_passive(true);
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            on_scroll.as_ref().unchecked_ref(),
            &passive,
        );
        on_scroll.forget();

        let weak = Rc::downgrade(self);
        let on_resize = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade() {
                let now = crate::now();
                let deadline: HostTime = shared.runtime.borrow_mut().engine.on_resize(now);
                shared
                    .resize_timer
                    .arm(deadline.saturating_duration_since(now));
            }
        }) as Box<dyn FnMut(Event)>);
        let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
        on_resize.forget();
    }

    /// Starts the insertion observer on the root element, so it works even
    /// before `<body>` has been parsed. Does nothing when the host lacks
    /// `MutationObserver`.
    fn observe_insertions(self: &Rc<Self>) {
        let settings = self.settings();
        let Some(root) = self.runtime.borrow().doc.document().document_element() else {
            console_debug("[strata] no root element; inserted targets need refresh()");
            return;
        };
        let marker = settings.marker_attribute;
        let selector = marker_selector(marker);
        let settle = settings.mutation_settle_delay;

        let weak = Rc::downgrade(self);
        let callback: MutationClosure = Closure::wrap(Box::new(
            move |records: js_sys::Array, _observer: MutationObserver| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let added = added_targets(&records, marker, &selector);
                let pending = match shared.runtime.try_borrow() {
                    Ok(runtime) => runtime.engine.has_untracked(&added),
                    Err(_) => !added.is_empty(),
                };
                if pending {
                    shared.init_timer.arm(settle);
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let Ok(observer) = MutationObserver::new(callback.as_ref().unchecked_ref()) else {
            console_debug("[strata] MutationObserver unavailable; inserted targets need refresh()");
            return;
        };
        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        if observer.observe_with_options(&root, &options).is_err() {
            console_debug("[strata] could not observe the document; inserted targets need refresh()");
            return;
        }
        *self.observer.borrow_mut() = Some((observer, callback));
    }
}

/// Marked elements among the nodes added by `records`, including marked
/// descendants of added subtrees.
fn added_targets(records: &js_sys::Array, marker: &str, selector: &str) -> Vec<HtmlElement> {
    let mut targets = Vec::new();
    for record in records.iter() {
        let Some(record) = record.dyn_ref::<MutationRecord>() else {
            continue;
        };
        let added = record.added_nodes();
        for el in (0..added.length())
            .filter_map(|i| added.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
        {
            if el.has_attribute(marker)
                && let Ok(el) = el.clone().dyn_into::<HtmlElement>()
            {
                targets.push(el);
            }
            let Ok(descendants) = el.query_selector_all(selector) else {
                continue;
            };
            targets.extend(
                (0..descendants.length())
                    .filter_map(|i| descendants.item(i))
                    .filter_map(|node| node.dyn_into::<HtmlElement>().ok()),
            );
        }
    }
    targets
}

/// Handle to a running parallax instance.
///
/// Published on `window` as [`GLOBAL_NAME`] by [`start`](crate::start), so
/// pages can call `strataParallax.refresh()` after injecting content the
/// observer cannot see, or `strataParallax.update()` after a layout change
/// that caused neither scroll nor resize.
#[wasm_bindgen]
#[derive(Clone)]
pub struct ParallaxHandle {
    shared: Rc<Shared>,
}

impl core::fmt::Debug for ParallaxHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParallaxHandle")
            .field("instances", &self.instances())
            .finish_non_exhaustive()
    }
}

impl ParallaxHandle {
    /// Creates an engine over the global document. Returns `None` outside a
    /// browser window.
    ///
    /// Nothing is prepared yet; call [`run_when_ready`](Self::run_when_ready)
    /// or [`refresh`](Self::refresh).
    #[must_use]
    pub fn install(settings: Settings) -> Option<Self> {
        let doc = DomDocument::from_global()?;
        let shared = Shared::new(settings, doc);
        if settings.observe_dynamic_content {
            shared.observe_insertions();
        }
        Some(Self { shared })
    }

    /// Prepares the document now if it has been parsed, otherwise on
    /// `DOMContentLoaded`.
    pub fn run_when_ready(&self) -> Result<(), JsValue> {
        let document = self.shared.runtime.borrow().doc.document().clone();
        if document.ready_state() != "loading" {
            self.refresh();
            return Ok(());
        }
        let weak = Rc::downgrade(&self.shared);
        let on_ready = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(shared) = weak.upgrade() {
                shared.refresh();
            }
        }) as Box<dyn FnMut(Event)>);
        let once = AddEventListenerOptions::new();
        once.set_once(true);
        document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
            &once,
        )?;
        on_ready.forget();
        Ok(())
    }

    /// Sets `window[name]` to this handle.
    pub fn publish(&self, name: &str) -> Result<(), JsValue> {
        let window = self.shared.runtime.borrow().doc.window().clone();
        js_sys::Reflect::set(&window, &JsValue::from_str(name), &JsValue::from(self.clone()))?;
        Ok(())
    }
}

#[wasm_bindgen]
impl ParallaxHandle {
    /// Prepares marked elements that are not tracked yet and runs one pass.
    /// Safe to call any number of times.
    pub fn refresh(&self) {
        self.shared.refresh();
    }

    /// Runs one evaluation pass over all tracked instances.
    pub fn update(&self) {
        self.shared.update();
    }

    /// Re-runs preparation after the framework-ready delay, once the host
    /// framework has finished inserting its DOM.
    #[wasm_bindgen(js_name = "onFrameworkReady")]
    pub fn on_framework_ready(&self) {
        let delay = self.shared.settings().framework_ready_delay;
        self.shared.init_timer.arm(delay);
    }

    /// Number of tracked instances.
    #[wasm_bindgen(getter)]
    pub fn instances(&self) -> usize {
        self.shared.runtime.borrow().engine.len()
    }

    /// Turns console tracing on or off. Needs the `trace` feature.
    #[wasm_bindgen(js_name = "setTracing")]
    pub fn set_tracing(&self, enabled: bool) {
        self.shared.runtime.borrow_mut().console = enabled.then_some(ConsoleSink);
    }

    /// The library version.
    pub fn version(&self) -> String {
        crate::version()
    }
}
