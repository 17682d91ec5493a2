// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for host-document integrations.
//!
//! Strata never owns the document. A backend exposes it through two traits:
//!
//! - [`LayoutHost`]: the live geometry reads and the style write that an
//!   evaluation pass needs. Small on purpose, so evaluation can be driven by a
//!   stubbed geometry provider.
//!
//! - [`HostDocument`]: the structural queries and mutations that preparation
//!   needs on top of that: finding marked elements, reading attributes and
//!   computed styles, creating and inserting containers.
//!
//! Backends also own the event plumbing the engine cannot express in
//! `no_std`: the scroll and resize listeners, the frame request, the resize
//! timer and any dynamic-content observer. They feed those events into
//! [`Parallax`](crate::engine::Parallax).
//!
//! # Failure model
//!
//! Host operations are infallible from the engine's point of view. Style
//! writes that the host rejects are dropped; structural operations report
//! failure through `Option`/`bool` so preparation can skip the element.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Size};

/// Geometry reads and style writes used by evaluation passes.
pub trait LayoutHost {
    /// Non-owning handle to a document element.
    ///
    /// Equality must be identity: two handles are equal iff they refer to
    /// the same element.
    type Element: Clone + PartialEq;

    /// Current viewport size in CSS pixels.
    fn viewport(&self) -> Size;

    /// Viewport-relative bounding rectangle of `element`.
    fn bounding_rect(&self, element: &Self::Element) -> Rect;

    /// Sets an inline style property on `element`.
    fn set_style(&mut self, element: &Self::Element, property: &str, value: &str);
}

/// Structural document access used by preparation.
pub trait HostDocument: LayoutHost {
    /// All elements carrying `attribute`, in document order.
    fn marked_elements(&self, attribute: &str) -> Vec<Self::Element>;

    /// The parent element of `element`, if attached.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Whether `element` carries `class`.
    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Raw value of attribute `name` on `element`.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Post-layout style values of `element` that a container inherits.
    fn computed_box(&self, element: &Self::Element) -> ComputedBox;

    /// Creates a detached element carrying `class`.
    fn create_container(&mut self, class: &str) -> Option<Self::Element>;

    /// Inserts `node` into `parent` immediately before `reference`.
    fn insert_before(
        &mut self,
        parent: &Self::Element,
        node: &Self::Element,
        reference: &Self::Element,
    ) -> bool;

    /// Moves `child` to the end of `parent`'s children.
    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element) -> bool;

    /// Detaches `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Element, child: &Self::Element) -> bool;
}

/// Computed (post-layout) box styles of a target, as strings in the host's
/// serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComputedBox {
    /// The `display` value.
    pub display: String,
    /// Explicit width, or `None` when the width is auto-computed.
    pub width: Option<String>,
    /// Explicit height, or `None` when the height is auto-computed.
    pub height: Option<String>,
    /// Margins in top, right, bottom, left order.
    pub margin: [String; 4],
    /// The `border-radius` value.
    pub border_radius: String,
    /// The `box-shadow` value.
    pub box_shadow: String,
}

impl ComputedBox {
    /// Whether the box generates a block-level outer display.
    #[must_use]
    pub fn is_block_level(&self) -> bool {
        matches!(
            self.display.trim(),
            "block" | "flex" | "grid" | "table" | "list-item" | "flow-root"
        )
    }

    /// Outer display for a container wrapping this box.
    #[must_use]
    pub fn container_display(&self) -> &'static str {
        if self.is_block_level() {
            "block"
        } else {
            "inline-block"
        }
    }

    /// Whether the box casts a shadow.
    #[must_use]
    pub fn has_shadow(&self) -> bool {
        let s = self.box_shadow.trim();
        !s.is_empty() && s != "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_display() {
        let mut b = ComputedBox {
            display: String::from("inline"),
            ..ComputedBox::default()
        };
        assert_eq!(b.container_display(), "inline-block");
        b.display = String::from("block");
        assert_eq!(b.container_display(), "block");
        b.display = String::from("flex");
        assert!(b.is_block_level());
    }

    #[test]
    fn shadow_detection() {
        let mut b = ComputedBox::default();
        assert!(!b.has_shadow());
        b.box_shadow = String::from("none");
        assert!(!b.has_shadow());
        b.box_shadow = String::from("rgba(0, 0, 0, 0.2) 0px 4px 12px 0px");
        assert!(b.has_shadow());
    }
}
