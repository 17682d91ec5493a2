// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transform value written to a target's `transform` style property.
//!
//! Percentages in the scaled variants are relative to the target's own
//! (scaled) box, which is why this type keeps them symbolic instead of
//! resolving to a matrix: the host's layout engine resolves them.

use core::fmt;

/// A 2-D transform produced by one evaluation of a tracked instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParallaxTransform {
    /// No displacement. Written when a breakpoint gate disables the effect.
    Identity,
    /// Vertical translation in pixels, emitted as a 3-D translation so the
    /// host can composite it on its own layer.
    TranslateY {
        /// Vertical offset in pixels.
        px: f64,
    },
    /// Uniform scale followed by a horizontal translation.
    ScaleTranslateX {
        /// Uniform scale factor.
        scale: f64,
        /// Horizontal offset in percent of the scaled box.
        x_percent: f64,
    },
    /// Uniform scale followed by a translation on both axes.
    ScaleTranslate {
        /// Uniform scale factor.
        scale: f64,
        /// Horizontal offset in percent of the scaled box.
        x_percent: f64,
        /// Vertical offset in percent of the scaled box.
        y_percent: f64,
    },
}

impl ParallaxTransform {
    /// Returns `true` for [`ParallaxTransform::Identity`].
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// Horizontal offset in percent, for the scaled variants.
    #[must_use]
    pub const fn x_percent(&self) -> Option<f64> {
        match *self {
            Self::ScaleTranslateX { x_percent, .. } | Self::ScaleTranslate { x_percent, .. } => {
                Some(x_percent)
            }
            Self::Identity | Self::TranslateY { .. } => None,
        }
    }
}

impl fmt::Display for ParallaxTransform {
    /// Formats the transform as a CSS `transform` value.
    ///
    /// Scale is always listed before translation so the percentages refer to
    /// the scaled box.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Identity => f.write_str("none"),
            Self::TranslateY { px } => write!(f, "translate3d(0px, {px}px, 0px)"),
            Self::ScaleTranslateX { scale, x_percent } => {
                write!(f, "scale({scale}) translateX({x_percent}%)")
            }
            Self::ScaleTranslate {
                scale,
                x_percent,
                y_percent,
            } => write!(f, "scale({scale}) translate({x_percent}%, {y_percent}%)"),
        }
    }
}
