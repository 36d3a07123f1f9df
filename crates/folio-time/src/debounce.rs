//! Interaction debouncer - turns raw begin/change/end signals into
//! pause/resume intents for the auto-advance timer
//!
//! The debouncer never touches the timer itself; it only reports intents.
//!
//! ```text
//!            begin                end
//!   Idle ──────────▶ Active ──────────▶ CoolingDown
//!    ▲                 ▲                   │   │
//!    │                 └───── begin ───────┘   │
//!    └──────── quiet period elapsed ───────────┘  (ResumeRequested)
//! ```

use std::time::Duration;

use folio_core::SessionTime;
use tracing::{debug, trace};

/// Quiet period after the last interaction before auto-advance resumes
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Bookkeeping for an ongoing interaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionWindow {
    pub started_at: SessionTime,
    pub last_change_at: SessionTime,
}

impl InteractionWindow {
    fn starting(now: SessionTime) -> Self {
        InteractionWindow {
            started_at: now,
            last_change_at: now,
        }
    }
}

/// Debouncer state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Active(InteractionWindow),
    /// Interaction ended; resume is due at `resume_at` unless re-entered
    CoolingDown { resume_at: SessionTime },
}

/// Intent: stop auto-advance while the user interacts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseRequested {
    pub at: SessionTime,
}

/// Intent: the quiet period elapsed, auto-advance may resume
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResumeRequested {
    pub at: SessionTime,
}

/// Interaction debouncer
#[derive(Clone, Debug)]
pub struct InteractionDebouncer {
    quiet_period: Duration,
    state: InteractionState,
}

impl InteractionDebouncer {
    /// Create a debouncer with the default 500 ms quiet period
    pub fn new() -> Self {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet_period: Duration) -> Self {
        InteractionDebouncer {
            quiet_period,
            state: InteractionState::Idle,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, InteractionState::Active(_))
    }

    /// Interaction started. Cancels any pending resume.
    ///
    /// A pause is requested on every begin, including an extra contact
    /// while already active.
    pub fn begin(&mut self, now: SessionTime) -> PauseRequested {
        self.state = match self.state {
            InteractionState::Active(window) => InteractionState::Active(InteractionWindow {
                last_change_at: now,
                ..window
            }),
            InteractionState::CoolingDown { resume_at } => {
                debug!(?resume_at, "interaction re-entered, pending resume cancelled");
                InteractionState::Active(InteractionWindow::starting(now))
            }
            InteractionState::Idle => InteractionState::Active(InteractionWindow::starting(now)),
        };
        trace!(?now, "interaction began");
        PauseRequested { at: now }
    }

    /// Interaction moved (e.g. drag)
    pub fn change(&mut self, now: SessionTime) {
        match &mut self.state {
            InteractionState::Active(window) => window.last_change_at = now,
            InteractionState::CoolingDown { resume_at } => {
                *resume_at = now + self.quiet_period;
                trace!(resume_at = ?*resume_at, "stray change while cooling down, resume pushed back");
            }
            InteractionState::Idle => {}
        }
    }

    /// Interaction ended; the quiet period starts now
    pub fn end(&mut self, now: SessionTime) {
        match self.state {
            InteractionState::Active(_) | InteractionState::CoolingDown { .. } => {
                let resume_at = now + self.quiet_period;
                self.state = InteractionState::CoolingDown { resume_at };
                debug!(?resume_at, "interaction ended, cooling down");
            }
            // End without a begin
            InteractionState::Idle => trace!(?now, "stray interaction end ignored"),
        }
    }

    /// Drop any ongoing interaction and pending resume without emitting
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Time at which a resume is due
    pub fn next_deadline(&self) -> Option<SessionTime> {
        match self.state {
            InteractionState::CoolingDown { resume_at } => Some(resume_at),
            InteractionState::Idle | InteractionState::Active(_) => None,
        }
    }

    /// Emit `ResumeRequested` once the quiet period has elapsed
    pub fn poll(&mut self, now: SessionTime) -> Option<ResumeRequested> {
        match self.state {
            InteractionState::CoolingDown { resume_at } if now >= resume_at => {
                self.state = InteractionState::Idle;
                debug!(?now, "quiet period elapsed, resume requested");
                Some(ResumeRequested { at: now })
            }
            _ => None,
        }
    }
}

impl Default for InteractionDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> SessionTime {
        SessionTime::from_millis(millis)
    }

    /// Poll every millisecond up to `until`, collecting resume times
    fn drain(debouncer: &mut InteractionDebouncer, from: u64, until: u64) -> Vec<u64> {
        (from..=until)
            .filter_map(|t| debouncer.poll(ms(t)).map(|r| r.at.as_millis()))
            .collect()
    }

    #[test]
    fn test_resume_after_quiet_period() {
        let mut debouncer = InteractionDebouncer::new();

        assert_eq!(debouncer.begin(ms(0)), PauseRequested { at: ms(0) });
        assert!(debouncer.is_active());
        debouncer.end(ms(100));

        assert_eq!(debouncer.next_deadline(), Some(ms(600)));
        assert_eq!(drain(&mut debouncer, 100, 2_000), vec![600]);
        assert_eq!(debouncer.state(), InteractionState::Idle);
    }

    #[test]
    fn test_reentry_cancels_pending_resume() {
        let mut debouncer = InteractionDebouncer::new();

        debouncer.begin(ms(0));
        debouncer.end(ms(100));
        assert_eq!(drain(&mut debouncer, 100, 299), Vec::<u64>::new());

        debouncer.begin(ms(300));
        assert_eq!(drain(&mut debouncer, 300, 499), Vec::<u64>::new());
        debouncer.end(ms(500));

        // No resume at 600 for the first end; exactly one at 1000
        assert_eq!(drain(&mut debouncer, 500, 3_000), vec![1_000]);
    }

    #[test]
    fn test_no_resume_while_active() {
        let mut debouncer = InteractionDebouncer::new();

        debouncer.begin(ms(0));
        for t in (0..5_000).step_by(50) {
            debouncer.change(ms(t));
        }
        assert_eq!(debouncer.next_deadline(), None);
        assert_eq!(drain(&mut debouncer, 0, 10_000), Vec::<u64>::new());

        match debouncer.state() {
            InteractionState::Active(window) => {
                assert_eq!(window.started_at, ms(0));
                assert_eq!(window.last_change_at, ms(4_950));
            }
            other => panic!("expected active, got {:?}", other),
        }
    }

    #[test]
    fn test_change_while_cooling_down_resets_countdown() {
        let mut debouncer = InteractionDebouncer::new();

        debouncer.begin(ms(0));
        debouncer.end(ms(100));
        debouncer.change(ms(400));

        assert_eq!(drain(&mut debouncer, 100, 2_000), vec![900]);
    }

    #[test]
    fn test_stray_end_and_change_are_ignored() {
        let mut debouncer = InteractionDebouncer::new();

        debouncer.change(ms(10));
        debouncer.end(ms(20));
        assert_eq!(debouncer.state(), InteractionState::Idle);
        assert_eq!(drain(&mut debouncer, 0, 2_000), Vec::<u64>::new());
    }

    #[test]
    fn test_second_contact_keeps_window_start() {
        let mut debouncer = InteractionDebouncer::new();

        debouncer.begin(ms(0));
        assert_eq!(debouncer.begin(ms(40)), PauseRequested { at: ms(40) });

        match debouncer.state() {
            InteractionState::Active(window) => assert_eq!(window.started_at, ms(0)),
            other => panic!("expected active, got {:?}", other),
        }
    }

    #[test]
    fn test_cancel_drops_pending_resume() {
        let mut debouncer = InteractionDebouncer::with_quiet_period(Duration::from_millis(200));

        debouncer.begin(ms(0));
        debouncer.end(ms(10));
        debouncer.cancel();

        assert_eq!(debouncer.next_deadline(), None);
        assert_eq!(drain(&mut debouncer, 0, 1_000), Vec::<u64>::new());
    }
}
