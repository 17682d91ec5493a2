// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sizing contract between preparation and evaluation.
//!
//! The evaluator only produces gap-free results if the target was sized by
//! the preparer first: vertical displacement relies on the target being
//! `height_percent`% of its container and centered, horizontal displacement
//! relies on `horizontal_scale` being applied in the same transform. An
//! [`Overscan`] is computed once from a [`TargetConfig`], stored on the
//! tracked instance, and read by both sides.

use alloc::format;
use alloc::string::String;

use crate::config::TargetConfig;

/// Percent subtracted from the horizontal translation bound so sub-pixel
/// rounding never exposes a container edge.
pub const EDGE_SAFETY_PERCENT: f64 = 0.5;

/// Overscan applied to a target so that displacement never exposes the
/// container background.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Overscan {
    /// Target height as a percentage of the container. `100` when the
    /// direction has no vertical overscan.
    pub height_percent: u32,
    /// Top offset in percent of the container. Negative values pull the
    /// target up so the overscan is split evenly above and below.
    pub top_offset_percent: f64,
    /// Uniform scale applied at evaluation time. `1.0` for vertical targets.
    pub horizontal_scale: f64,
}

impl Overscan {
    /// Derives the overscan for a target configuration.
    #[must_use]
    pub fn for_target(config: &TargetConfig) -> Self {
        let height_percent = if config.direction.has_vertical_overscan() {
            config.height_percent
        } else {
            100
        };
        let horizontal_scale = if config.direction.is_scaled() {
            config.horizontal_scale
        } else {
            1.0
        };
        Self {
            height_percent,
            top_offset_percent: (100.0 - f64::from(height_percent)) / 2.0,
            horizontal_scale,
        }
    }

    /// Largest horizontal translation, in percent of the scaled box, that
    /// keeps the scaled target covering its container.
    ///
    /// `max(0, ((scale - 1) / 2) * 100 - 0.5)`
    #[must_use]
    pub fn max_translate_x_percent(&self) -> f64 {
        max_translate_percent(self.horizontal_scale)
    }

    /// Style declarations sizing the target inside its container.
    #[must_use]
    pub fn sizing_declarations(&self) -> [(&'static str, String); 4] {
        [
            ("position", String::from("relative")),
            ("width", String::from("100%")),
            ("height", format!("{}%", self.height_percent)),
            ("top", format!("{}%", self.top_offset_percent)),
        ]
    }
}

/// See [`Overscan::max_translate_x_percent`].
#[must_use]
pub fn max_translate_percent(horizontal_scale: f64) -> f64 {
    (((horizontal_scale - 1.0) / 2.0) * 100.0 - EDGE_SAFETY_PERCENT).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Direction, Settings};

    fn config(direction: Direction) -> TargetConfig {
        TargetConfig {
            direction,
            ..TargetConfig::defaults(&Settings::new())
        }
    }

    #[test]
    fn vertical_overscan_is_centered() {
        let o = Overscan::for_target(&config(Direction::Vertical));
        assert_eq!(o.height_percent, 130);
        assert_eq!(o.top_offset_percent, -15.0);
        assert_eq!(o.horizontal_scale, 1.0);
        let decls = o.sizing_declarations();
        assert_eq!(decls[2], ("height", String::from("130%")));
        assert_eq!(decls[3], ("top", String::from("-15%")));
    }

    #[test]
    fn horizontal_fills_container() {
        let o = Overscan::for_target(&config(Direction::Horizontal));
        assert_eq!(o.height_percent, 100);
        assert_eq!(o.top_offset_percent, 0.0);
        assert_eq!(o.horizontal_scale, 1.1);
        assert_eq!(o.sizing_declarations()[3], ("top", String::from("0%")));
    }

    #[test]
    fn both_sizes_vertically_and_scales() {
        let o = Overscan::for_target(&config(Direction::Both));
        assert_eq!(o.height_percent, 130);
        assert_eq!(o.horizontal_scale, 1.1);
    }

    #[test]
    fn translate_bound() {
        assert!((max_translate_percent(1.2) - 9.5).abs() < 1e-9);
        assert!((max_translate_percent(1.1) - 4.5).abs() < 1e-9);
        // Scales at or below 1.01 leave no room at all.
        assert_eq!(max_translate_percent(1.005), 0.0);
        assert_eq!(max_translate_percent(0.8), 0.0);
    }
}
