// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance transform evaluation.
//!
//! Evaluation is a pure function of the instance's configuration and overscan
//! plus two live geometry reads: the viewport size and the container's
//! viewport-relative bounding rectangle.
//!
//! For each instance:
//!
//! 1. **Breakpoint gate**: if the viewport width falls in a band whose
//!    disable flag is set on the instance, the result is
//!    [`Evaluation::Gated`] and no geometry is inspected.
//! 2. **Visibility gate**: a container entirely above or below the viewport
//!    yields [`Evaluation::Offscreen`]; the caller leaves the last applied
//!    transform in place.
//! 3. **Progress**: `scroll = (vh - top) / (vh + height)` sweeps 0 → 1 as the
//!    container passes through the viewport; `center = scroll - 0.5`.
//! 4. **Displacement**: see [`displacement`].

use kurbo::{Rect, Size};

use crate::config::{Direction, Settings, TargetConfig};
use crate::overscan::Overscan;
use crate::transform::ParallaxTransform;

/// Pixels of vertical travel per unit of center progress at speed 1.
pub const VERTICAL_TRAVEL_PX: f64 = 200.0;

/// Percent of vertical travel per unit of center progress at speed 1, for
/// [`Direction::Both`].
pub const VERTICAL_TRAVEL_PERCENT: f64 = 100.0;

/// Viewport-width band used by the breakpoint gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Band {
    /// Narrower than [`Settings::mobile_breakpoint`].
    Mobile,
    /// From the mobile breakpoint up to [`Settings::tablet_breakpoint`].
    Tablet,
    /// At or above the tablet breakpoint.
    Desktop,
}

impl Band {
    /// Classifies a viewport width.
    #[must_use]
    pub fn for_width(width: f64, settings: &Settings) -> Self {
        if width < settings.mobile_breakpoint {
            Self::Mobile
        } else if width < settings.tablet_breakpoint {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    /// Whether `config` disables the effect in this band.
    #[must_use]
    pub const fn disables(self, config: &TargetConfig) -> bool {
        match self {
            Self::Mobile => config.disable_below_mobile_breakpoint,
            Self::Tablet => config.disable_below_tablet_breakpoint,
            Self::Desktop => false,
        }
    }
}

/// Outcome of evaluating one instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Evaluation {
    /// Disabled for the current band; the identity transform must be written.
    Gated,
    /// The container is outside the viewport; nothing is written.
    Offscreen,
    /// The computed transform must be written.
    Displaced(ParallaxTransform),
}

impl Evaluation {
    /// The transform to write, if any.
    #[must_use]
    pub const fn transform(&self) -> Option<ParallaxTransform> {
        match *self {
            Self::Gated => Some(ParallaxTransform::Identity),
            Self::Offscreen => None,
            Self::Displaced(t) => Some(t),
        }
    }
}

/// Whether `container` overlaps the vertical extent of a viewport of height
/// `viewport_height`.
///
/// Touching an edge counts as outside.
#[must_use]
pub fn is_visible(viewport_height: f64, container: Rect) -> bool {
    !(container.y0 >= viewport_height || container.y1 <= 0.0)
}

/// Normalized passage of `container` through the viewport: 0 when its top
/// sits on the viewport's bottom edge, 1 when its bottom sits on the top edge.
#[must_use]
pub fn scroll_progress(viewport_height: f64, container: Rect) -> f64 {
    (viewport_height - container.y0) / (viewport_height + container.height())
}

/// Maps center progress (`scroll_progress - 0.5`) to a transform.
///
/// - Vertical: `center * 200 * speed` px, unclamped.
/// - Horizontal: scale, then `-center * 2 * max * speed` percent clamped to
///   `[-max, max]` where `max` is [`Overscan::max_translate_x_percent`].
/// - Both: the horizontal part as above plus `center * 100 * speed` percent
///   vertically, unclamped.
#[must_use]
pub fn displacement(
    config: &TargetConfig,
    overscan: &Overscan,
    center_progress: f64,
) -> ParallaxTransform {
    let speed = config.speed;
    match config.direction {
        Direction::Vertical => ParallaxTransform::TranslateY {
            px: unsigned_zero(center_progress * VERTICAL_TRAVEL_PX * speed),
        },
        Direction::Horizontal => ParallaxTransform::ScaleTranslateX {
            scale: overscan.horizontal_scale,
            x_percent: clamped_x(overscan, center_progress, speed),
        },
        Direction::Both => ParallaxTransform::ScaleTranslate {
            scale: overscan.horizontal_scale,
            x_percent: clamped_x(overscan, center_progress, speed),
            y_percent: unsigned_zero(center_progress * VERTICAL_TRAVEL_PERCENT * speed),
        },
    }
}

fn clamped_x(overscan: &Overscan, center_progress: f64, speed: f64) -> f64 {
    let max = overscan.max_translate_x_percent();
    let desired = -center_progress * 2.0 * max * speed;
    unsigned_zero(desired.clamp(-max, max))
}

/// Keeps `-0` out of serialized transforms.
fn unsigned_zero(v: f64) -> f64 {
    v + 0.0
}

/// Evaluates one instance against the current viewport and container
/// geometry.
#[must_use]
pub fn evaluate(
    settings: &Settings,
    config: &TargetConfig,
    overscan: &Overscan,
    viewport: Size,
    container: Rect,
) -> Evaluation {
    evaluate_with(settings, config, overscan, viewport, || container)
}

/// Like [`evaluate`], but only queries the container rectangle once the
/// breakpoint gate has passed.
pub fn evaluate_with(
    settings: &Settings,
    config: &TargetConfig,
    overscan: &Overscan,
    viewport: Size,
    container: impl FnOnce() -> Rect,
) -> Evaluation {
    if Band::for_width(viewport.width, settings).disables(config) {
        return Evaluation::Gated;
    }
    let container = container();
    if !is_visible(viewport.height, container) {
        return Evaluation::Offscreen;
    }
    let center = scroll_progress(viewport.height, container) - 0.5;
    Evaluation::Displaced(displacement(config, overscan, center))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn config(direction: Direction, speed: f64, scale: f64) -> TargetConfig {
        TargetConfig {
            direction,
            speed,
            horizontal_scale: scale,
            ..TargetConfig::defaults(&Settings::new())
        }
    }

    fn desktop() -> Size {
        Size::new(1000.0, 800.0)
    }

    #[test]
    fn vertical_scenario() {
        let c = config(Direction::Vertical, 2.0, 1.1);
        let o = Overscan::for_target(&c);
        let container = Rect::new(0.0, 400.0, 1000.0, 1200.0);
        assert!((scroll_progress(800.0, container) - 0.25).abs() < EPS);

        let e = evaluate(&Settings::new(), &c, &o, desktop(), container);
        let Evaluation::Displaced(ParallaxTransform::TranslateY { px }) = e else {
            panic!("expected a vertical translation, got {e:?}");
        };
        assert!((px + 100.0).abs() < EPS, "got {px}");
    }

    #[test]
    fn horizontal_scenario() {
        let c = config(Direction::Horizontal, 1.0, 1.2);
        let o = Overscan::for_target(&c);
        let t = displacement(&c, &o, 0.5);
        let ParallaxTransform::ScaleTranslateX { scale, x_percent } = t else {
            panic!("expected scale + translateX, got {t:?}");
        };
        assert_eq!(scale, 1.2);
        assert!((x_percent + 9.5).abs() < EPS, "got {x_percent}");
    }

    #[test]
    fn centered_container_has_no_offset() {
        let v = config(Direction::Vertical, 3.0, 1.1);
        assert_eq!(
            displacement(&v, &Overscan::for_target(&v), 0.0),
            ParallaxTransform::TranslateY { px: 0.0 }
        );

        let b = config(Direction::Both, 3.0, 1.1);
        let t = displacement(&b, &Overscan::for_target(&b), 0.0);
        let ParallaxTransform::ScaleTranslate { y_percent, .. } = t else {
            panic!("expected scale + translate, got {t:?}");
        };
        assert_eq!(y_percent, 0.0);

        // A container centered in an 800px viewport has center progress 0.
        let container = Rect::new(0.0, 200.0, 1000.0, 600.0);
        assert!((scroll_progress(800.0, container) - 0.5).abs() < EPS);
    }

    #[test]
    fn horizontal_translation_stays_within_bound() {
        for &scale in &[0.9, 1.0, 1.05, 1.1, 1.2, 1.5] {
            for &speed in &[-50.0, -2.0, -0.3, 0.0, 0.7, 2.0, 10.0, 1e6] {
                for dir in [Direction::Horizontal, Direction::Both] {
                    let c = config(dir, speed, scale);
                    let o = Overscan::for_target(&c);
                    let max = o.max_translate_x_percent();
                    let mut p = -0.5;
                    while p <= 0.5 {
                        let x = displacement(&c, &o, p)
                            .x_percent()
                            .expect("scaled directions carry x");
                        assert!(
                            (-max..=max).contains(&x),
                            "x={x} outside ±{max} (scale={scale}, speed={speed}, p={p})"
                        );
                        p += 0.05;
                    }
                }
            }
        }
    }

    #[test]
    fn negative_sign_sweeps_right_to_left() {
        let c = config(Direction::Horizontal, 1.0, 1.2);
        let o = Overscan::for_target(&c);
        let entering = displacement(&c, &o, -0.5).x_percent().unwrap_or_default();
        let leaving = displacement(&c, &o, 0.5).x_percent().unwrap_or_default();
        assert!(entering > 0.0 && leaving < 0.0);
    }

    #[test]
    fn both_vertical_part_is_unclamped() {
        let c = config(Direction::Both, 10.0, 1.1);
        let o = Overscan::for_target(&c);
        let t = displacement(&c, &o, 0.5);
        let ParallaxTransform::ScaleTranslate { y_percent, .. } = t else {
            panic!("expected scale + translate, got {t:?}");
        };
        assert!((y_percent - 500.0).abs() < EPS);
    }

    #[test]
    fn mobile_width_is_gated_regardless_of_position() {
        let c = config(Direction::Vertical, 2.0, 1.1);
        let o = Overscan::for_target(&c);
        let viewport = Size::new(500.0, 800.0);
        for top in [-5000.0, -100.0, 0.0, 400.0, 5000.0] {
            let container = Rect::new(0.0, top, 500.0, top + 300.0);
            assert_eq!(
                evaluate(&Settings::new(), &c, &o, viewport, container),
                Evaluation::Gated
            );
        }
        assert_eq!(Evaluation::Gated.transform(), Some(ParallaxTransform::Identity));
    }

    #[test]
    fn bands_consult_their_own_flag() {
        let settings = Settings::new();
        let mut c = config(Direction::Vertical, 2.0, 1.1);
        c.disable_below_mobile_breakpoint = false;
        assert!(!Band::for_width(500.0, &settings).disables(&c));
        assert!(Band::for_width(800.0, &settings).disables(&c));
        assert!(!Band::for_width(992.0, &settings).disables(&c));
        c.disable_below_tablet_breakpoint = false;
        assert!(!Band::for_width(800.0, &settings).disables(&c));
        assert_eq!(Band::for_width(768.0, &settings), Band::Tablet);
    }

    #[test]
    fn offscreen_containers_are_skipped() {
        let c = config(Direction::Vertical, 2.0, 1.1);
        let o = Overscan::for_target(&c);
        let settings = Settings::new();
        let above = Rect::new(0.0, -500.0, 1000.0, 0.0);
        let below = Rect::new(0.0, 800.0, 1000.0, 1200.0);
        for r in [above, below] {
            assert_eq!(
                evaluate(&settings, &c, &o, desktop(), r),
                Evaluation::Offscreen
            );
        }
        assert_eq!(Evaluation::Offscreen.transform(), None);
    }
}
