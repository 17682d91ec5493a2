// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target preparation: wrapping and style normalization.
//!
//! Preparing a target establishes the geometry that evaluation assumes:
//!
//! 1. The target sits inside a *container*: a positioned element with
//!    clipped overflow. If the target's parent already carries the container
//!    class it is reused as-is; otherwise a new container is inserted at the
//!    target's position and takes over the target's outer box (display mode,
//!    explicit size, margins, border radius and shadow).
//! 2. The target is normalized to fill and overflow the container according
//!    to its [`Overscan`].
//!
//! Preparation of a single element is not idempotent by itself; the engine
//! makes it so by consulting its registry before calling
//! [`Preparer::prepare`].

use crate::backend::HostDocument;
use crate::config::{AttributeNames, Settings, TargetConfig};
use crate::overscan::Overscan;
use crate::registry::TrackedInstance;
use crate::trace::{ContainerSource, PrepareSkip};

const MARGIN_PROPERTIES: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];

/// A freshly prepared target, ready to be registered.
#[derive(Clone, Debug, PartialEq)]
pub struct Prepared<E> {
    /// The record to register.
    pub instance: TrackedInstance<E>,
    /// Whether the container was created by this call.
    pub container_source: ContainerSource,
}

/// Prepares marked elements for evaluation.
#[derive(Clone, Debug)]
pub struct Preparer {
    settings: Settings,
    names: AttributeNames,
}

impl Preparer {
    /// Creates a preparer for the given settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            names: settings.attribute_names(),
            settings,
        }
    }

    /// The settings this preparer reads attributes with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Reads the configuration of `element`.
    pub fn read_config<D: HostDocument>(&self, doc: &D, element: &D::Element) -> TargetConfig {
        TargetConfig::from_attributes(&self.settings, &self.names, |name| {
            doc.attribute(element, name)
        })
    }

    /// Wraps and normalizes `element`.
    ///
    /// Returns the reason the element cannot be prepared, leaving the
    /// document as it was, when it has no parent or the host cannot create
    /// and insert a container.
    pub fn prepare<D: HostDocument>(
        &self,
        doc: &mut D,
        element: &D::Element,
    ) -> Result<Prepared<D::Element>, PrepareSkip> {
        let parent = doc.parent(element).ok_or(PrepareSkip::NoParent)?;
        let config = self.read_config(doc, element);
        let overscan = Overscan::for_target(&config);

        let (container, container_source) =
            if doc.has_class(&parent, self.settings.container_class) {
                (parent, ContainerSource::Reused)
            } else {
                (self.wrap(doc, &parent, element)?, ContainerSource::Created)
            };

        doc.set_style(&container, "position", "relative");
        doc.set_style(&container, "overflow", "hidden");

        doc.set_style(element, "display", "block");
        doc.set_style(element, "object-fit", "cover");
        doc.set_style(element, "will-change", "transform");
        doc.set_style(element, "border-radius", "0");
        for (property, value) in overscan.sizing_declarations() {
            doc.set_style(element, property, &value);
        }

        Ok(Prepared {
            instance: TrackedInstance {
                element: element.clone(),
                container,
                config,
                overscan,
            },
            container_source,
        })
    }

    /// Inserts a new container around `element`, moving its outer box onto
    /// the container.
    fn wrap<D: HostDocument>(
        &self,
        doc: &mut D,
        parent: &D::Element,
        element: &D::Element,
    ) -> Result<D::Element, PrepareSkip> {
        let computed = doc.computed_box(element);
        let container = doc
            .create_container(self.settings.container_class)
            .ok_or(PrepareSkip::ContainerUnavailable)?;

        doc.set_style(&container, "display", computed.container_display());
        if let Some(width) = &computed.width {
            doc.set_style(&container, "width", width);
        }
        if let Some(height) = &computed.height {
            doc.set_style(&container, "height", height);
        }
        for (property, value) in MARGIN_PROPERTIES.iter().zip(&computed.margin) {
            doc.set_style(&container, property, value);
        }
        doc.set_style(&container, "border-radius", &computed.border_radius);

        if !doc.insert_before(parent, &container, element) {
            return Err(PrepareSkip::ContainerUnavailable);
        }
        if !doc.append_child(&container, element) {
            doc.remove_child(parent, &container);
            return Err(PrepareSkip::ContainerUnavailable);
        }

        // The target is only restyled once it sits inside the container.
        if computed.has_shadow() {
            doc.set_style(&container, "box-shadow", &computed.box_shadow);
            doc.set_style(element, "box-shadow", "none");
        }
        doc.set_style(element, "margin", "0");
        Ok(container)
    }
}
