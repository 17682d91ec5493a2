// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`HostDocument`] over the live DOM.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size};
use strata_core::backend::{ComputedBox, HostDocument, LayoutHost};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{Document, HtmlElement, Window};

/// The browser document, seen through the engine's host traits.
///
/// Targets and containers are [`HtmlElement`]s; marked elements that are not
/// HTML elements (SVG, MathML) are ignored.
#[derive(Clone, Debug)]
pub struct DomDocument {
    window: Window,
    document: Document,
}

impl DomDocument {
    /// Wraps `window` and its document.
    #[must_use]
    pub fn new(window: Window) -> Option<Self> {
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// Wraps the global window, if there is one.
    #[must_use]
    pub fn from_global() -> Option<Self> {
        Self::new(web_sys::window()?)
    }

    /// The wrapped window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The wrapped document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// CSS attribute selector matching elements that carry `attribute`.
pub(crate) fn marker_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}

/// Inline size if one is set, else the presentational attribute in pixels.
fn explicit_size(element: &HtmlElement, property: &str) -> Option<String> {
    let inline = element
        .style()
        .get_property_value(property)
        .ok()
        .filter(|v| is_explicit(v));
    inline.or_else(|| attribute_px(&element.get_attribute(property)?))
}

fn is_explicit(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v != "auto"
}

fn attribute_px(raw: &str) -> Option<String> {
    let px: f64 = raw.trim().parse().ok()?;
    (px.is_finite() && px > 0.0).then(|| format!("{px}px"))
}

fn dimension(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

impl LayoutHost for DomDocument {
    type Element = HtmlElement;

    fn viewport(&self) -> Size {
        Size::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn bounding_rect(&self, element: &HtmlElement) -> Rect {
        let r = element.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn set_style(&mut self, element: &HtmlElement, property: &str, value: &str) {
        let _ = element.style().set_property(property, value);
    }
}

impl HostDocument for DomDocument {
    fn marked_elements(&self, attribute: &str) -> Vec<HtmlElement> {
        let Ok(list) = self.document.query_selector_all(&marker_selector(attribute)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn parent(&self, element: &HtmlElement) -> Option<HtmlElement> {
        element.parent_element()?.dyn_into().ok()
    }

    fn has_class(&self, element: &HtmlElement, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn attribute(&self, element: &HtmlElement, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn computed_box(&self, element: &HtmlElement) -> ComputedBox {
        let Some(style) = self.window.get_computed_style(element).ok().flatten() else {
            return ComputedBox::default();
        };
        let get = |property: &str| style.get_property_value(property).unwrap_or_default();
        ComputedBox {
            display: get("display"),
            width: explicit_size(element, "width"),
            height: explicit_size(element, "height"),
            margin: [
                get("margin-top"),
                get("margin-right"),
                get("margin-bottom"),
                get("margin-left"),
            ],
            border_radius: get("border-radius"),
            box_shadow: get("box-shadow"),
        }
    }

    fn create_container(&mut self, class: &str) -> Option<HtmlElement> {
        let container: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
        container.class_list().add_1(class).ok()?;
        Some(container)
    }

    fn insert_before(
        &mut self,
        parent: &HtmlElement,
        node: &HtmlElement,
        reference: &HtmlElement,
    ) -> bool {
        parent.insert_before(node, Some(reference.as_ref())).is_ok()
    }

    fn append_child(&mut self, parent: &HtmlElement, child: &HtmlElement) -> bool {
        parent.append_child(child).is_ok()
    }

    fn remove_child(&mut self, parent: &HtmlElement, child: &HtmlElement) -> bool {
        parent.remove_child(child).is_ok()
    }
}
