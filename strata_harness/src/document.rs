// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host document.
//!
//! [`FakeDocument`] is a small element tree with attributes, classes, inline
//! styles and scripted geometry. Element rectangles are given in page
//! coordinates; [`LayoutHost::bounding_rect`] subtracts the current scroll
//! offset, the way a browser reports viewport-relative rectangles. An element
//! without its own rectangle takes the rectangle of its first child that has
//! one, so a container inserted around a target reports the target's box.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Size, Vec2};
use strata_core::backend::{ComputedBox, HostDocument, LayoutHost};

/// Handle to a node in a [`FakeDocument`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    computed: ComputedBox,
    page_rect: Option<Rect>,
}

/// An element tree implementing [`HostDocument`].
#[derive(Debug)]
pub struct FakeDocument {
    nodes: Vec<Node>,
    viewport: Size,
    scroll_y: f64,
    style_writes: usize,
    refuse_containers: bool,
    refuse_appends: bool,
}

impl FakeDocument {
    /// Creates a document containing only a root `body` element.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        let body = Node {
            tag: String::from("body"),
            ..Node::default()
        };
        Self {
            nodes: alloc::vec![body],
            viewport,
            scroll_y: 0.0,
            style_writes: 0,
            refuse_containers: false,
            refuse_appends: false,
        }
    }

    /// The root element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Creates a detached element.
    pub fn create(&mut self, tag: &str) -> NodeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "test documents stay far below u32::MAX nodes"
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            tag: String::from(tag),
            computed: ComputedBox {
                display: String::from("inline"),
                box_shadow: String::from("none"),
                border_radius: String::from("0px"),
                margin: core::array::from_fn(|_| String::from("0px")),
                ..ComputedBox::default()
            },
            ..Node::default()
        });
        id
    }

    /// Creates an element and appends it to `parent`.
    pub fn append(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create(tag);
        self.attach(parent, id, None);
        id
    }

    /// Creates an `img` under `parent` carrying `marker` and occupying
    /// `page_rect`.
    pub fn append_target(&mut self, parent: NodeId, marker: &str, page_rect: Rect) -> NodeId {
        let id = self.append(parent, "img");
        self.set_attribute(id, marker, "");
        self.set_page_rect(id, page_rect);
        id
    }

    /// Sets an attribute.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attributes
            .insert(String::from(name), String::from(value));
    }

    /// Adds a class.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.node_mut(node).classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(String::from(class));
        }
    }

    /// Sets the element's rectangle in page coordinates.
    pub fn set_page_rect(&mut self, node: NodeId, rect: Rect) {
        self.node_mut(node).page_rect = Some(rect);
    }

    /// Replaces the element's computed box styles.
    pub fn set_computed(&mut self, node: NodeId, computed: ComputedBox) {
        self.node_mut(node).computed = computed;
    }

    /// Scrolls the document to vertical offset `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Changes the viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Makes [`HostDocument::create_container`] fail.
    pub fn refuse_containers(&mut self, refuse: bool) {
        self.refuse_containers = refuse;
    }

    /// Makes [`HostDocument::append_child`] fail.
    pub fn refuse_appends(&mut self, refuse: bool) {
        self.refuse_appends = refuse;
    }

    /// Detaches `node` from its parent.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != node);
        }
    }

    /// The tag name of `node`.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.node(node).tag
    }

    /// The parent of `node`.
    #[must_use]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// The children of `node`, in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Inline style property `property` of `node`.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node).style.get(property).map(String::as_str)
    }

    /// Whether `node` carries `class`.
    #[must_use]
    pub fn class_list_contains(&self, node: NodeId, class: &str) -> bool {
        self.node(node).classes.iter().any(|c| c == class)
    }

    /// Number of attached elements carrying `class`.
    #[must_use]
    pub fn count_with_class(&self, class: &str) -> usize {
        self.preorder()
            .into_iter()
            .filter(|&n| self.class_list_contains(n, class))
            .count()
    }

    /// Total number of style writes performed through [`LayoutHost`].
    #[must_use]
    pub fn style_writes(&self) -> usize {
        self.style_writes
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    fn is_attached(&self, mut id: NodeId) -> bool {
        loop {
            if id == self.body() {
                return true;
            }
            match self.node(id).parent {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Attached elements in document order.
    fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self.body()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    fn page_rect(&self, id: NodeId) -> Option<Rect> {
        let node = self.node(id);
        node.page_rect
            .or_else(|| node.children.iter().find_map(|&c| self.page_rect(c)))
    }

    /// Moves `node` under `parent`, before `reference` or at the end.
    fn attach(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) -> bool {
        let index = match reference {
            Some(r) => match self.node(parent).children.iter().position(|&c| c == r) {
                Some(i) => i,
                None => return false,
            },
            None => self.node(parent).children.len(),
        };
        self.detach(node);
        // Detaching may have shifted the reference left.
        let index = match reference {
            Some(r) => self
                .node(parent)
                .children
                .iter()
                .position(|&c| c == r)
                .unwrap_or(index),
            None => self.node(parent).children.len(),
        };
        self.node_mut(parent).children.insert(index, node);
        self.node_mut(node).parent = Some(parent);
        true
    }
}

impl LayoutHost for FakeDocument {
    type Element = NodeId;

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        if !self.is_attached(*element) {
            return Rect::ZERO;
        }
        self.page_rect(*element)
            .map_or(Rect::ZERO, |r| r - Vec2::new(0.0, self.scroll_y))
    }

    fn set_style(&mut self, element: &NodeId, property: &str, value: &str) {
        self.style_writes += 1;
        self.node_mut(*element)
            .style
            .insert(String::from(property), String::from(value));
    }
}

impl HostDocument for FakeDocument {
    fn marked_elements(&self, attribute: &str) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&n| self.node(n).attributes.contains_key(attribute))
            .collect()
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.node(*element).parent
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.class_list_contains(*element, class)
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(*element).attributes.get(name).cloned()
    }

    fn computed_box(&self, element: &NodeId) -> ComputedBox {
        self.node(*element).computed.clone()
    }

    fn create_container(&mut self, class: &str) -> Option<NodeId> {
        if self.refuse_containers {
            return None;
        }
        let id = self.create("div");
        self.add_class(id, class);
        Some(id)
    }

    fn insert_before(&mut self, parent: &NodeId, node: &NodeId, reference: &NodeId) -> bool {
        self.attach(*parent, *node, Some(*reference))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> bool {
        !self.refuse_appends && self.attach(*parent, *child, None)
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> bool {
        if self.node(*child).parent != Some(*parent) {
            return false;
        }
        self.detach(*child);
        true
    }
}
