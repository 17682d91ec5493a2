// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine settings and per-target configuration.
//!
//! [`Settings`] is the build-time configuration surface: attribute naming,
//! per-target defaults, breakpoints and trigger delays. [`TargetConfig`] is
//! read once per target element when it is prepared and never changes
//! afterwards.
//!
//! Attribute parsing never fails. Missing, malformed or out-of-range values
//! fall back to the defaults carried by [`Settings`].

use alloc::format;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

use crate::time::Duration;

/// Axis (or axes) along which a target is displaced while scrolling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Pure vertical pixel translation.
    #[default]
    Vertical,
    /// Uniform overscale plus a clamped horizontal translation.
    Horizontal,
    /// Overscale, clamped horizontal translation and unclamped vertical
    /// translation.
    Both,
}

impl Direction {
    /// Returns the attribute spelling of this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Both => "both",
        }
    }

    /// Whether the target is sized taller than its container.
    #[must_use]
    pub const fn has_vertical_overscan(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }

    /// Whether the evaluator applies `horizontal_scale`.
    #[must_use]
    pub const fn is_scaled(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }
}

/// Error returned when a string is not a known [`Direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnknownDirection;

impl fmt::Display for UnknownDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of `vertical`, `horizontal`, `both`")
    }
}

impl core::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("vertical") {
            Ok(Self::Vertical)
        } else if s.eq_ignore_ascii_case("horizontal") {
            Ok(Self::Horizontal)
        } else if s.eq_ignore_ascii_case("both") {
            Ok(Self::Both)
        } else {
            Err(UnknownDirection)
        }
    }
}

/// Build-time configuration of the engine.
///
/// Construct with [`Settings::new`] (or `Default`) and override fields as
/// needed before handing the settings to
/// [`Parallax::new`](crate::engine::Parallax::new).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Attribute marking an element as a parallax target. Per-target
    /// configuration attributes are derived from it (`<marker>-speed`, ...).
    pub marker_attribute: &'static str,
    /// Class identifying an element that already serves as a container.
    pub container_class: &'static str,
    /// Direction used when the target does not specify one.
    pub default_direction: Direction,
    /// Speed multiplier used when the target does not specify one.
    pub default_speed: f64,
    /// Target height, in percent of the container, for vertical overscan.
    pub default_height_percent: u32,
    /// Uniform scale used for horizontal overscan.
    pub default_horizontal_scale: f64,
    /// Viewport widths below this are the mobile band.
    pub mobile_breakpoint: f64,
    /// Viewport widths from `mobile_breakpoint` up to this are the tablet band.
    pub tablet_breakpoint: f64,
    /// Whether the backend watches the document for newly inserted targets.
    pub observe_dynamic_content: bool,
    /// Quiet period after the last resize event before a pass runs.
    pub resize_quiet_period: Duration,
    /// Delay between detecting inserted targets and re-running preparation.
    pub mutation_settle_delay: Duration,
    /// Delay between a host framework's ready callback and preparation.
    pub framework_ready_delay: Duration,
}

impl Settings {
    /// The documented defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            marker_attribute: "data-parallax",
            container_class: "parallax-container",
            default_direction: Direction::Vertical,
            default_speed: 2.0,
            default_height_percent: 130,
            default_horizontal_scale: 1.1,
            mobile_breakpoint: 768.0,
            tablet_breakpoint: 992.0,
            observe_dynamic_content: true,
            resize_quiet_period: Duration::from_millis(150),
            mutation_settle_delay: Duration::from_millis(100),
            framework_ready_delay: Duration::from_millis(250),
        }
    }

    /// Returns the names of the per-target configuration attributes.
    #[must_use]
    pub fn attribute_names(&self) -> AttributeNames {
        let m = self.marker_attribute;
        AttributeNames {
            direction: format!("{m}-direction"),
            speed: format!("{m}-speed"),
            height: format!("{m}-height"),
            scale: format!("{m}-scale"),
            mobile: format!("{m}-mobile"),
            tablet: format!("{m}-tablet"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Fully-qualified per-target attribute names, derived from
/// [`Settings::marker_attribute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeNames {
    /// Direction attribute.
    pub direction: String,
    /// Speed multiplier attribute.
    pub speed: String,
    /// Height percentage attribute.
    pub height: String,
    /// Horizontal scale attribute.
    pub scale: String,
    /// Mobile-disable flag attribute.
    pub mobile: String,
    /// Tablet-disable flag attribute.
    pub tablet: String,
}

/// Per-target configuration, fixed at preparation time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetConfig {
    /// Displacement axes.
    pub direction: Direction,
    /// Displacement multiplier. Unbounded; negative values reverse the sweep.
    pub speed: f64,
    /// Rendered height as a percentage of the container.
    pub height_percent: u32,
    /// Uniform scale for [`Direction::Horizontal`] and [`Direction::Both`].
    pub horizontal_scale: f64,
    /// Apply the identity transform when the viewport is in the mobile band.
    pub disable_below_mobile_breakpoint: bool,
    /// Apply the identity transform when the viewport is in the tablet band.
    pub disable_below_tablet_breakpoint: bool,
}

impl TargetConfig {
    /// The configuration of a target that carries no configuration
    /// attributes.
    #[must_use]
    pub const fn defaults(settings: &Settings) -> Self {
        Self {
            direction: settings.default_direction,
            speed: settings.default_speed,
            height_percent: settings.default_height_percent,
            horizontal_scale: settings.default_horizontal_scale,
            disable_below_mobile_breakpoint: true,
            disable_below_tablet_breakpoint: true,
        }
    }

    /// Reads the configuration through `attribute`, which returns the raw
    /// value of a named attribute on the target, if present.
    pub fn from_attributes(
        settings: &Settings,
        names: &AttributeNames,
        mut attribute: impl FnMut(&str) -> Option<String>,
    ) -> Self {
        let defaults = Self::defaults(settings);
        Self {
            direction: attribute(&names.direction)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.direction),
            speed: attribute(&names.speed)
                .and_then(|v| parse_finite(&v))
                .unwrap_or(defaults.speed),
            height_percent: attribute(&names.height)
                .and_then(|v| parse_percent(&v))
                .unwrap_or(defaults.height_percent),
            horizontal_scale: attribute(&names.scale)
                .and_then(|v| parse_finite(&v))
                .unwrap_or(defaults.horizontal_scale),
            disable_below_mobile_breakpoint: attribute(&names.mobile)
                .map_or(defaults.disable_below_mobile_breakpoint, |v| parse_guard(&v)),
            disable_below_tablet_breakpoint: attribute(&names.tablet)
                .map_or(defaults.disable_below_tablet_breakpoint, |v| parse_guard(&v)),
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is range-checked before the cast, which truncates toward zero"
)]
fn parse_percent(raw: &str) -> Option<u32> {
    let v = parse_finite(raw)?;
    (v >= 1.0 && v < f64::from(u32::MAX) + 1.0).then(|| v as u32)
}

/// Only an explicit `false` turns a guard off.
fn parse_guard(raw: &str) -> bool {
    !raw.trim().eq_ignore_ascii_case("false")
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::ToString as _;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> TargetConfig {
        let settings = Settings::new();
        let names = settings.attribute_names();
        let attrs: BTreeMap<&str, &str> = pairs.iter().copied().collect();
        TargetConfig::from_attributes(&settings, &names, |name| {
            attrs.get(name).map(|v| v.to_string())
        })
    }

    #[test]
    fn no_attributes_yields_defaults() {
        let c = config_from(&[]);
        assert_eq!(c.direction, Direction::Vertical);
        assert_eq!(c.speed, 2.0);
        assert_eq!(c.height_percent, 130);
        assert_eq!(c.horizontal_scale, 1.1);
        assert!(c.disable_below_mobile_breakpoint);
        assert!(c.disable_below_tablet_breakpoint);
    }

    #[test]
    fn attribute_names_follow_marker() {
        let mut settings = Settings::new();
        settings.marker_attribute = "data-drift";
        let names = settings.attribute_names();
        assert_eq!(names.speed, "data-drift-speed");
        assert_eq!(names.tablet, "data-drift-tablet");
    }

    #[test]
    fn explicit_values_are_read() {
        let c = config_from(&[
            ("data-parallax-direction", " Both "),
            ("data-parallax-speed", "-1.5"),
            ("data-parallax-height", "150"),
            ("data-parallax-scale", "1.25"),
            ("data-parallax-mobile", "false"),
            ("data-parallax-tablet", "FALSE"),
        ]);
        assert_eq!(c.direction, Direction::Both);
        assert_eq!(c.speed, -1.5);
        assert_eq!(c.height_percent, 150);
        assert_eq!(c.horizontal_scale, 1.25);
        assert!(!c.disable_below_mobile_breakpoint);
        assert!(!c.disable_below_tablet_breakpoint);
    }

    #[test]
    fn malformed_values_fall_back() {
        let c = config_from(&[
            ("data-parallax-direction", "diagonal"),
            ("data-parallax-speed", "fast"),
            ("data-parallax-height", "-20"),
            ("data-parallax-scale", "NaN"),
            ("data-parallax-mobile", "no"),
        ]);
        assert_eq!(c, TargetConfig::defaults(&Settings::new()));
    }

    #[test]
    fn fractional_height_truncates() {
        assert_eq!(config_from(&[("data-parallax-height", "140.8")]).height_percent, 140);
    }

    #[test]
    fn height_bounds() {
        assert_eq!(parse_percent("0.9"), None);
        assert_eq!(parse_percent("-130"), None);
        assert_eq!(parse_percent("1.5"), Some(1));
        assert_eq!(parse_percent("4294967295.5"), Some(u32::MAX));
        assert_eq!(parse_percent("4294967296"), None);
    }

    #[test]
    fn direction_round_trips_through_as_str() {
        for d in [Direction::Vertical, Direction::Horizontal, Direction::Both] {
            assert_eq!(d.as_str().parse::<Direction>(), Ok(d));
        }
        assert_eq!("".parse::<Direction>(), Err(UnknownDirection));
    }
}
