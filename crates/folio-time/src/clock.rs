//! Session clock for folio timed components

use std::time::{Duration, Instant};

use folio_core::SessionTime;

/// Session clock - monotonic, anchored at session start
///
/// Maps instants of a monotonic clock onto `SessionTime` and back. Instants
/// earlier than the anchor map to `SessionTime::ZERO`.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    /// Instant corresponding to `SessionTime::ZERO`
    reference: Instant,
}

impl SessionClock {
    /// Create a clock anchored at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock anchored at a given instant
    pub fn starting_at(reference: Instant) -> Self {
        SessionClock { reference }
    }

    /// Current session time
    pub fn now(&self) -> SessionTime {
        self.now_at(Instant::now())
    }

    /// Session time of an arbitrary instant
    pub fn now_at(&self, instant: Instant) -> SessionTime {
        SessionTime::from_elapsed(instant.saturating_duration_since(self.reference))
    }

    /// Instant at which a session time is reached
    pub fn instant_at(&self, t: SessionTime) -> Instant {
        self.reference
            .checked_add(t.as_duration())
            .unwrap_or_else(|| self.reference + Duration::from_secs(86_400 * 365))
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_clock_maps_instants() {
        let start = Instant::now();
        let clock = SessionClock::starting_at(start);

        assert_eq!(clock.now_at(start), SessionTime::ZERO);
        assert_eq!(
            clock.now_at(start + Duration::from_millis(250)),
            SessionTime::from_millis(250)
        );
    }

    #[test]
    fn test_session_clock_round_trips_deadlines() {
        let clock = SessionClock::new();
        let deadline = SessionTime::from_millis(2_000);

        assert_eq!(clock.now_at(clock.instant_at(deadline)), deadline);
    }

    #[test]
    fn test_session_clock_monotonic() {
        let clock = SessionClock::new();

        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = clock.now();

        assert!(t2 > t1);
    }
}
