// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time for the deferral points of the update loop.
//!
//! [`HostTime`] is a point in time in microseconds from an arbitrary monotonic
//! origin (on the web, `performance.now()` scaled to µs). [`Duration`] uses the
//! same unit. Only the resize debounce and the delayed re-preparation triggers
//! read time; evaluation itself is time-independent.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as monotonic microseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw microsecond value.
    #[inline]
    #[must_use]
    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Creates a [`HostTime`] from fractional milliseconds, as delivered by
    /// `performance.now()` and `requestAnimationFrame` timestamps.
    ///
    /// Negative and non-finite inputs map to the origin.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "page-lifetime timestamps are small positive f64; µs fits in u64"
    )]
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Self((ms * 1000.0) as u64)
        } else {
            Self(0)
        }
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}µs)", self.0)
    }
}

/// A duration in microseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Creates a duration from whole milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1000)
    }

    /// Returns the raw microsecond value.
    #[inline]
    #[must_use]
    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Returns the duration in whole milliseconds, rounding down.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1000
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({}µs)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_conversion() {
        assert_eq!(Duration::from_millis(150).micros(), 150_000);
        assert_eq!(Duration(150_999).as_millis(), 150);
        assert_eq!(HostTime::from_millis_f64(16.5), HostTime(16_500));
    }

    #[test]
    fn bogus_timestamps_map_to_origin() {
        assert_eq!(HostTime::from_millis_f64(-3.0), HostTime(0));
        assert_eq!(HostTime::from_millis_f64(f64::NAN), HostTime(0));
        assert_eq!(HostTime::from_millis_f64(f64::INFINITY), HostTime(0));
    }

    #[test]
    fn host_time_duration_ops() {
        let t = HostTime(1000);
        let d = Duration(200);
        assert_eq!((t + d).micros(), 1200);
        assert_eq!(t - HostTime(400), Duration(600));
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
    }
}
