//! Navigation controller - orchestrates moves, policy and timers
//!
//! Move protocol for `go_to`:
//! 1. resolve the neighbour of the current page (none -> boundary no-op)
//! 2. ask `should_move` (veto -> no-op)
//! 3. `will_move`, commit, display, `did_move`
//! 4. restart auto-advance from a full interval
//!
//! Auto-advance ticks run `go_to(Next)` and always leave the timer armed
//! afterwards, so vetoed and boundary ticks keep retrying on later ticks.

use std::sync::{Arc, Weak};
use std::time::Duration;

use folio_core::{
    positive_interval, Direction, DisplaySink, MovePolicy, PageId, PageProvider, PageSet,
    SessionTime,
};
use folio_time::{
    AutoAdvanceTimer, InteractionDebouncer, InteractionState, ResumeRequested, TimerState,
    DEFAULT_QUIET_PERIOD,
};
use tracing::{debug, trace, warn};

/// Result of a navigation attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Move committed
    Moved { from: PageId, to: PageId },
    /// No neighbour in that direction (or the current page is unknown)
    Boundary,
    /// Policy refused the move
    Vetoed { target: PageId },
    /// Setup has not produced a page set yet
    Uninitialized,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Point-in-time view of a navigation session
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationSnapshot {
    pub current: Option<PageId>,
    pub previous: Option<PageId>,
    pub next: Option<PageId>,
    pub page_count: usize,
    pub cyclic: bool,
    pub swipe_interval: Option<Duration>,
    pub timer: TimerState,
    pub interaction: InteractionState,
}

/// Navigation controller
pub struct NavigationController<S: DisplaySink> {
    /// Pages of the current session
    pages: PageSet,
    /// Current page; `None` until setup succeeds
    current: Option<PageId>,
    timer: AutoAdvanceTimer,
    debouncer: InteractionDebouncer,
    sink: S,
    /// Non-owning link to the move policy
    policy: Option<Weak<dyn MovePolicy>>,
    /// Interval set before setup; consumed by the next `setup`
    pending_interval: Option<Duration>,
}

impl<S: DisplaySink> NavigationController<S> {
    /// Create a controller with the default quiet period
    pub fn new(sink: S) -> Self {
        Self::with_quiet_period(sink, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(sink: S, quiet_period: Duration) -> Self {
        NavigationController {
            pages: PageSet::empty(),
            current: None,
            timer: AutoAdvanceTimer::new(),
            debouncer: InteractionDebouncer::with_quiet_period(quiet_period),
            sink,
            policy: None,
            pending_interval: None,
        }
    }

    /// Attach a policy without taking ownership of it
    pub fn set_policy(&mut self, policy: Weak<dyn MovePolicy>) {
        self.policy = Some(policy);
    }

    pub fn clear_policy(&mut self) {
        self.policy = None;
    }

    /// Live policy, if one is attached and still alive
    fn policy(&self) -> Option<Arc<dyn MovePolicy>> {
        self.policy.as_ref().and_then(Weak::upgrade)
    }

    /// Initialize the session from a provider.
    ///
    /// Pending callbacks of a previous session are cancelled first. An empty
    /// page list leaves the controller uninitialized: nothing is displayed
    /// and no timer is armed. Returns whether the session is initialized.
    pub fn setup(&mut self, provider: &dyn PageProvider, now: SessionTime) -> bool {
        let pending_interval = self.pending_interval.take();
        self.teardown();

        let pages = provider.pages();
        let Some(first) = pages.first().copied() else {
            debug!("setup: provider returned no pages, session left uninitialized");
            self.pending_interval = pending_interval;
            return false;
        };
        self.pages = PageSet::new(pages, provider.is_cyclic());
        debug!(
            pages = self.pages.len(),
            cyclic = self.pages.is_cyclic(),
            ?first,
            "setup: session initialized"
        );

        let policy = self.policy();
        if let Some(policy) = &policy {
            policy.will_move(first);
        }
        self.current = Some(first);
        self.sink.display(first, None);
        if let Some(policy) = &policy {
            policy.did_move(first);
        }

        let interval = positive_interval(provider.swipe_interval()).or(pending_interval);
        if interval.is_some() {
            self.set_swipe_interval(interval, now);
        }
        true
    }

    /// Move one page in `direction`. See the module docs for the protocol.
    pub fn go_to(&mut self, direction: Direction, now: SessionTime) -> MoveOutcome {
        let Some(from) = self.current else {
            trace!(?direction, "go_to ignored: session uninitialized");
            return MoveOutcome::Uninitialized;
        };
        let Some(to) = self.pages.neighbor(from, direction) else {
            debug!(?from, ?direction, "go_to: boundary reached");
            return MoveOutcome::Boundary;
        };

        let policy = self.policy();
        if let Some(policy) = &policy {
            if !policy.should_move(from, to) {
                debug!(?from, ?to, "go_to: move vetoed by policy");
                return MoveOutcome::Vetoed { target: to };
            }
            policy.will_move(to);
        }

        self.current = Some(to);
        self.sink.display(to, Some(direction));
        debug!(?from, ?to, ?direction, "go_to: move committed");

        if let Some(policy) = &policy {
            policy.did_move(to);
        }

        // Every committed move restarts the countdown from zero
        self.restart_timer(now);

        MoveOutcome::Moved { from, to }
    }

    pub fn go_to_next(&mut self, now: SessionTime) -> MoveOutcome {
        self.go_to(Direction::Next, now)
    }

    pub fn go_to_previous(&mut self, now: SessionTime) -> MoveOutcome {
        self.go_to(Direction::Previous, now)
    }

    /// Change the auto-swipe interval. `None` or zero stops auto-advance.
    ///
    /// Before setup the interval is only recorded; it is armed once a page
    /// set exists.
    pub fn set_swipe_interval(&mut self, interval: Option<Duration>, now: SessionTime) {
        if self.current.is_none() {
            self.pending_interval = positive_interval(interval);
            return;
        }

        if let Some(armed) = self.timer.configure(interval, now) {
            self.notify_will_start_ticking(armed.interval);
        }
    }

    pub fn swipe_interval(&self) -> Option<Duration> {
        self.timer.interval().or(self.pending_interval)
    }

    /// Interaction started: pause auto-advance
    pub fn interaction_began(&mut self, now: SessionTime) {
        let pause = self.debouncer.begin(now);
        if self.timer.interval().is_some() {
            self.timer.suspend(pause.at);
        }
    }

    pub fn interaction_changed(&mut self, now: SessionTime) {
        self.debouncer.change(now);
    }

    /// Interaction ended: auto-advance resumes after the quiet period
    pub fn interaction_ended(&mut self, now: SessionTime) {
        self.debouncer.end(now);
    }

    /// A transition driven by the widget itself (e.g. a user swipe) finished.
    ///
    /// When `completed` and the page belongs to the set, it becomes current
    /// and the policy is told via `did_move`. The widget already shows the
    /// page, so the sink is not called. Returns whether state changed.
    pub fn finish_transition(&mut self, page: PageId, completed: bool) -> bool {
        if !completed || self.current.is_none() {
            trace!(?page, completed, "finish_transition ignored");
            return false;
        }
        if !self.pages.contains(page) {
            warn!(?page, "finish_transition for a page outside the set");
            return false;
        }

        self.current = Some(page);
        debug!(?page, "finish_transition: widget transition committed");
        if let Some(policy) = self.policy() {
            policy.did_move(page);
        }
        true
    }

    /// Earliest pending deadline across the timer and the debouncer
    pub fn next_deadline(&self) -> Option<SessionTime> {
        match (self.timer.next_deadline(), self.debouncer.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Handle everything due at `now`.
    ///
    /// Returns the outcome of the auto-advance attempt when a tick fired.
    pub fn poll(&mut self, now: SessionTime) -> Option<MoveOutcome> {
        if let Some(resume) = self.debouncer.poll(now) {
            self.on_resume(resume);
        }

        let tick = self.timer.poll(now)?;
        trace!(generation = tick.generation, deadline = ?tick.deadline, "auto-advance tick");

        let outcome = self.go_to(Direction::Next, now);
        if !outcome.is_moved() {
            // Vetoed, boundary or uninitialized: keep ticking
            self.restart_timer(now);
        }
        Some(outcome)
    }

    /// Cancel pending callbacks, then drop the session state
    pub fn teardown(&mut self) {
        self.timer.stop();
        self.debouncer.cancel();

        if self.current.is_some() {
            debug!("teardown: navigation session released");
        }
        self.timer = AutoAdvanceTimer::new();
        self.current = None;
        self.pages = PageSet::empty();
    }

    pub fn current(&self) -> Option<PageId> {
        self.current
    }

    pub fn next_page(&self) -> Option<PageId> {
        self.current
            .and_then(|page| self.pages.neighbor(page, Direction::Next))
    }

    pub fn previous_page(&self) -> Option<PageId> {
        self.current
            .and_then(|page| self.pages.neighbor(page, Direction::Previous))
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    pub fn page_set(&self) -> &PageSet {
        &self.pages
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.debouncer.state()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            current: self.current,
            previous: self.previous_page(),
            next: self.next_page(),
            page_count: self.pages.len(),
            cyclic: self.pages.is_cyclic(),
            swipe_interval: self.timer.interval(),
            timer: self.timer.state(),
            interaction: self.debouncer.state(),
        }
    }

    fn on_resume(&mut self, resume: ResumeRequested) {
        if self.current.is_some() && self.timer.interval().is_some() {
            debug!(at = ?resume.at, "resuming auto-advance after interaction");
            self.restart_timer(resume.at);
        }
    }

    fn restart_timer(&mut self, now: SessionTime) {
        if let Some(armed) = self.timer.start(now) {
            self.notify_will_start_ticking(armed.interval);
        }
    }

    fn notify_will_start_ticking(&self, interval: Duration) {
        if let Some(policy) = self.policy() {
            policy.will_start_ticking(interval);
        }
    }
}

impl<S: DisplaySink> Drop for NavigationController<S> {
    fn drop(&mut self) {
        self.timer.stop();
        self.debouncer.cancel();
    }
}
