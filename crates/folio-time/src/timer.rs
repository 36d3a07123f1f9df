//! Auto-advance timer - a single pending one-shot tick
//!
//! INVARIANT: at most one tick is pending at any time. Every `start` replaces
//! the previous schedule, so two starts in a row yield exactly one tick.
//!
//! A fired tick does not re-arm itself. Whoever handles the tick is
//! responsible for calling `start` again, on every path (veto and boundary
//! included) if auto-advance should keep going.

use std::time::Duration;

use folio_core::{positive_interval, SessionTime};
use tracing::{debug, trace};

/// Timer state, owned exclusively by `AutoAdvanceTimer`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Nothing pending
    #[default]
    Idle,
    /// One tick pending at `deadline`
    Scheduled {
        deadline: SessionTime,
        interval: Duration,
    },
    /// Paused by user interaction; `remaining` is what was left of the
    /// interrupted countdown. Resuming re-arms the full interval.
    Suspended { remaining: Duration },
}

/// Notification emitted when the timer (re)arms
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Armed {
    pub interval: Duration,
    pub deadline: SessionTime,
    /// Number of times the timer has been armed, including this one
    pub generation: u64,
}

/// A fired tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    /// Deadline the tick was scheduled for
    pub deadline: SessionTime,
    /// Time the tick was observed (>= deadline)
    pub fired_at: SessionTime,
}

/// Auto-advance timer
#[derive(Clone, Debug, Default)]
pub struct AutoAdvanceTimer {
    /// Configured interval; `None` disables auto-advance
    interval: Option<Duration>,
    state: TimerState,
    generation: u64,
}

impl AutoAdvanceTimer {
    /// Create an idle timer with no interval
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured interval, if auto-advance is enabled
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, TimerState::Scheduled { .. })
    }

    /// Number of times the timer has been armed
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set the interval.
    ///
    /// A positive interval (re)starts scheduling immediately. `None` or a zero
    /// interval stops and clears the timer without firing.
    pub fn configure(&mut self, interval: Option<Duration>, now: SessionTime) -> Option<Armed> {
        self.interval = positive_interval(interval);
        match self.interval {
            Some(_) => self.start(now),
            None => {
                debug!("auto-advance disabled");
                self.stop();
                None
            }
        }
    }

    /// Cancel any pending tick and arm a new one a full interval from `now`.
    ///
    /// Returns the `Armed` notification, or `None` when no interval is
    /// configured (nothing is scheduled in that case).
    pub fn start(&mut self, now: SessionTime) -> Option<Armed> {
        self.stop();
        let interval = self.interval?;

        self.generation += 1;
        let deadline = now + interval;
        self.state = TimerState::Scheduled { deadline, interval };
        debug!(
            generation = self.generation,
            ?interval,
            ?deadline,
            "auto-advance armed"
        );

        Some(Armed {
            interval,
            deadline,
            generation: self.generation,
        })
    }

    /// Cancel the pending tick, if any. Idempotent.
    pub fn stop(&mut self) {
        if self.state != TimerState::Idle {
            trace!(state = ?self.state, "auto-advance stopped");
        }
        self.state = TimerState::Idle;
    }

    /// Pause a scheduled tick, keeping the remaining time for observation.
    /// Returns `true` if a pending tick was suspended.
    pub fn suspend(&mut self, now: SessionTime) -> bool {
        match self.state {
            TimerState::Scheduled { deadline, .. } => {
                let remaining = deadline - now;
                self.state = TimerState::Suspended { remaining };
                debug!(?remaining, "auto-advance suspended");
                true
            }
            TimerState::Idle | TimerState::Suspended { .. } => false,
        }
    }

    /// Deadline of the pending tick
    pub fn next_deadline(&self) -> Option<SessionTime> {
        match self.state {
            TimerState::Scheduled { deadline, .. } => Some(deadline),
            TimerState::Idle | TimerState::Suspended { .. } => None,
        }
    }

    /// Fire the pending tick if its deadline has passed.
    ///
    /// Fires at most once per arming; the timer is idle afterwards.
    pub fn poll(&mut self, now: SessionTime) -> Option<Tick> {
        match self.state {
            TimerState::Scheduled { deadline, .. } if now >= deadline => {
                self.state = TimerState::Idle;
                trace!(generation = self.generation, ?deadline, ?now, "auto-advance tick");
                Some(Tick {
                    generation: self.generation,
                    deadline,
                    fired_at: now,
                })
            }
            _ => None,
        }
    }
}
