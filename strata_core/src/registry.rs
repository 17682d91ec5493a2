// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked-instance storage.
//!
//! The [`Registry`] exclusively owns one [`TrackedInstance`] per prepared
//! target. Instances are appended by preparation passes and live for the
//! lifetime of the engine; there is no removal.
//!
//! The registry is also the side-table answering "has this element already
//! been prepared?", so the document's markup never carries bookkeeping
//! attributes.

use alloc::vec::Vec;
use core::fmt;

use crate::config::TargetConfig;
use crate::overscan::Overscan;

/// A handle to an instance in a [`Registry`].
///
/// Handles are dense, start at zero and follow registration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub u32);

impl InstanceId {
    /// Returns the raw index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

/// Runtime record of one prepared target.
///
/// `element` and `container` are non-owning handles into the host document.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedInstance<E> {
    /// The target element.
    pub element: E,
    /// The clipping, positioned container wrapping `element`.
    pub container: E,
    /// Configuration read at preparation time.
    pub config: TargetConfig,
    /// Sizing applied at preparation time.
    pub overscan: Overscan,
}

/// Append-only collection of tracked instances.
#[derive(Debug)]
pub struct Registry<E> {
    instances: Vec<TrackedInstance<E>>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Registry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// Appends an instance and returns its handle.
    pub fn register(&mut self, instance: TrackedInstance<E>) -> InstanceId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a page cannot hold u32::MAX parallax targets"
        )]
        let id = InstanceId(self.instances.len() as u32);
        self.instances.push(instance);
        id
    }

    /// Returns the instance behind `id`.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> Option<&TrackedInstance<E>> {
        self.instances.get(id.0 as usize)
    }

    /// Visits every instance in registration order.
    pub fn for_each(&self, mut visit: impl FnMut(InstanceId, &TrackedInstance<E>)) {
        for (id, instance) in self.iter() {
            visit(id, instance);
        }
    }

    /// Iterates instances in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &TrackedInstance<E>)> {
        self.instances.iter().enumerate().map(|(i, instance)| {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "register() never hands out indices above u32::MAX"
            )]
            let id = InstanceId(i as u32);
            (id, instance)
        })
    }

    /// Number of tracked instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no instance has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<E: PartialEq> Registry<E> {
    /// Returns the instance tracking `element`, if it has been prepared.
    #[must_use]
    pub fn find(&self, element: &E) -> Option<InstanceId> {
        self.iter()
            .find(|(_, instance)| instance.element == *element)
            .map(|(id, _)| id)
    }

    /// Whether `element` has already been prepared.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.find(element).is_some()
    }
}
