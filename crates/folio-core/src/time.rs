//! Time primitives for folio
//!
//! Every timed component is driven by `SessionTime`, a monotonic offset from
//! the start of a navigation session. Keeping deadlines in this form lets the
//! timer and debouncer run against a real clock or a virtual one.

use std::ops::{Add, Sub};
use std::time::Duration;

/// Session time - monotonic, microseconds since session start
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionTime(pub u64);

impl SessionTime {
    pub const ZERO: SessionTime = SessionTime(0);
    pub const MAX: SessionTime = SessionTime(u64::MAX);

    #[inline]
    pub fn from_micros(micros: u64) -> Self {
        SessionTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: u64) -> Self {
        SessionTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SessionTime((secs.max(0.0) * 1_000_000.0) as u64)
    }

    /// Session time after `elapsed` has passed since session start
    #[inline]
    pub fn from_elapsed(elapsed: Duration) -> Self {
        SessionTime::ZERO.saturating_add(elapsed)
    }

    #[inline]
    pub fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0 / 1000
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Offset from session start
    #[inline]
    pub fn as_duration(self) -> Duration {
        Duration::from_micros(self.0)
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        SessionTime(self.0.saturating_add(micros))
    }

    #[inline]
    pub fn saturating_sub(self, duration: Duration) -> Self {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        SessionTime(self.0.saturating_sub(micros))
    }
}

impl Add<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub<SessionTime> for SessionTime {
    type Output = Duration;

    /// Saturates at zero when `rhs` is later than `self`
    #[inline]
    fn sub(self, rhs: SessionTime) -> Self::Output {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for SessionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({:.3}s)", self.as_secs_f64())
    }
}

/// Normalise an auto-swipe interval given in seconds.
///
/// Zero, negative, NaN and infinite values all mean "no auto-advance".
pub fn interval_from_secs(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

/// Normalise an optional interval: a zero duration disables auto-advance.
#[inline]
pub fn positive_interval(interval: Option<Duration>) -> Option<Duration> {
    interval.filter(|d| !d.is_zero())
}
