//! Carousel Simulator - deterministic virtual-time harness
//!
//! Drives a `NavigationController` without any runtime: time only moves when
//! the test says so, and every due deadline is polled at exactly its
//! scheduled instant, in order.

use std::sync::{Arc, Weak};
use std::time::Duration;

use folio_core::{Direction, MovePolicy, PageId, PageProvider, SessionTime};
use folio_runtime::{MoveOutcome, NavigationController, NavigationSnapshot};
use folio_time::DEFAULT_QUIET_PERIOD;
use tracing::trace;

use crate::{RecordingPolicy, RecordingSink};

/// One page shown by the sink, stamped with virtual time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Displayed {
    pub at: SessionTime,
    pub page: PageId,
    pub direction: Option<Direction>,
}

/// Auto-advance tick and what came of it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickRecord {
    pub at: SessionTime,
    pub outcome: MoveOutcome,
}

/// Virtual-time navigation session
pub struct CarouselSimulator {
    controller: NavigationController<RecordingSink>,
    sink: RecordingSink,
    policy: Arc<RecordingPolicy>,
    now: SessionTime,
    timeline: Vec<Displayed>,
    ticks: Vec<TickRecord>,
}

impl CarouselSimulator {
    /// Set up a session at t=0 with the default quiet period
    pub fn new(provider: &dyn PageProvider, policy: RecordingPolicy) -> Self {
        Self::with_quiet_period(provider, policy, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(
        provider: &dyn PageProvider,
        policy: RecordingPolicy,
        quiet_period: Duration,
    ) -> Self {
        let sink = RecordingSink::new();
        let policy = Arc::new(policy);
        let mut controller = NavigationController::with_quiet_period(sink.clone(), quiet_period);
        let weak: Weak<dyn MovePolicy> = Arc::downgrade(&policy) as Weak<dyn MovePolicy>;
        controller.set_policy(weak);

        let mut sim = CarouselSimulator {
            controller,
            sink,
            policy,
            now: SessionTime::ZERO,
            timeline: Vec::new(),
            ticks: Vec::new(),
        };
        sim.controller.setup(provider, sim.now);
        sim.collect();
        sim
    }

    pub fn now(&self) -> SessionTime {
        self.now
    }

    /// Advance virtual time by `d`, firing everything due on the way
    pub fn advance(&mut self, d: Duration) {
        let target = self.now + d;
        self.run_until(target);
    }

    /// Advance to absolute time `t`; moving backwards is a no-op
    pub fn at(&mut self, t: SessionTime) -> &mut Self {
        if t > self.now {
            self.run_until(t);
        }
        self
    }

    /// Advance to `millis` after session start
    pub fn at_millis(&mut self, millis: u64) -> &mut Self {
        self.at(SessionTime::from_millis(millis))
    }

    fn run_until(&mut self, target: SessionTime) {
        while let Some(deadline) = self.controller.next_deadline() {
            if deadline > target {
                break;
            }
            self.now = self.now.max(deadline);
            if let Some(outcome) = self.controller.poll(self.now) {
                trace!(at = ?self.now, ?outcome, "simulated tick");
                self.ticks.push(TickRecord {
                    at: self.now,
                    outcome,
                });
            }
            self.collect();
        }
        self.now = target;
    }

    pub fn go_next(&mut self) -> MoveOutcome {
        self.go(Direction::Next)
    }

    pub fn go_previous(&mut self) -> MoveOutcome {
        self.go(Direction::Previous)
    }

    pub fn go(&mut self, direction: Direction) -> MoveOutcome {
        let outcome = self.controller.go_to(direction, self.now);
        self.collect();
        outcome
    }

    pub fn begin_interaction(&mut self) {
        self.controller.interaction_began(self.now);
    }

    pub fn change_interaction(&mut self) {
        self.controller.interaction_changed(self.now);
    }

    pub fn end_interaction(&mut self) {
        self.controller.interaction_ended(self.now);
    }

    pub fn set_interval(&mut self, interval: Option<Duration>) {
        self.controller.set_swipe_interval(interval, self.now);
    }

    pub fn finish_transition(&mut self, page: PageId, completed: bool) -> bool {
        self.controller.finish_transition(page, completed)
    }

    pub fn teardown(&mut self) {
        self.controller.teardown();
    }

    /// Every page displayed so far, with the time it was shown
    pub fn timeline(&self) -> &[Displayed] {
        &self.timeline
    }

    /// Displayed pages in order
    pub fn pages(&self) -> Vec<PageId> {
        self.timeline.iter().map(|d| d.page).collect()
    }

    /// Display times in milliseconds
    pub fn display_times_ms(&self) -> Vec<u64> {
        self.timeline.iter().map(|d| d.at.as_millis()).collect()
    }

    pub fn ticks(&self) -> &[TickRecord] {
        &self.ticks
    }

    pub fn current(&self) -> Option<PageId> {
        self.controller.current()
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        self.controller.snapshot()
    }

    pub fn next_deadline(&self) -> Option<SessionTime> {
        self.controller.next_deadline()
    }

    pub fn policy(&self) -> &RecordingPolicy {
        &self.policy
    }

    pub fn controller(&self) -> &NavigationController<RecordingSink> {
        &self.controller
    }

    /// Stamp sink entries not seen yet with the current time
    fn collect(&mut self) {
        let now = self.now;
        let fresh = self.sink.since(self.timeline.len());
        self.timeline
            .extend(fresh.into_iter().map(|(page, direction)| Displayed {
                at: now,
                page,
                direction,
            }));
    }
}

/// Predefined simulation scenarios
pub mod scenarios {
    use super::*;
    use folio_core::StaticProvider;

    pub const A: PageId = PageId(1);
    pub const B: PageId = PageId(2);
    pub const C: PageId = PageId(3);

    /// [A, B, C], cyclic, 2 s auto-advance
    pub fn cyclic_abc() -> CarouselSimulator {
        let provider = StaticProvider::new([A, B, C])
            .cyclic(true)
            .with_interval(Duration::from_secs(2));
        CarouselSimulator::new(&provider, RecordingPolicy::permissive())
    }

    /// [A, B], linear, 1 s auto-advance
    pub fn linear_ab() -> CarouselSimulator {
        let provider = StaticProvider::new([A, B]).with_interval(Duration::from_secs(1));
        CarouselSimulator::new(&provider, RecordingPolicy::permissive())
    }

    /// [A, B, C], cyclic, 1 s auto-advance, every move refused
    pub fn vetoing() -> CarouselSimulator {
        let provider = StaticProvider::new([A, B, C])
            .cyclic(true)
            .with_interval(Duration::from_secs(1));
        CarouselSimulator::new(&provider, RecordingPolicy::vetoing_all())
    }

    /// [A, B], linear, no auto-advance
    pub fn manual_ab() -> CarouselSimulator {
        CarouselSimulator::new(&StaticProvider::new([A, B]), RecordingPolicy::permissive())
    }
}

#[cfg(test)]
mod tests {
    use super::scenarios::*;
    use super::*;
    use crate::PolicyEvent;
    use folio_core::StaticProvider;
    use folio_time::TimerState;
    use proptest::prelude::*;

    #[test]
    fn test_cyclic_auto_advance_wraps() {
        let mut sim = cyclic_abc();
        sim.advance(Duration::from_secs(6));

        assert_eq!(sim.pages(), vec![A, B, C, A]);
        assert_eq!(sim.display_times_ms(), vec![0, 2_000, 4_000, 6_000]);
        assert_eq!(sim.policy().did_moves(), vec![A, B, C, A]);
        assert_eq!(
            sim.timeline()[3].direction,
            Some(Direction::Next)
        );
    }

    #[test]
    fn test_previous_at_linear_start_is_silent() {
        let mut sim = manual_ab();
        sim.policy().take_events();

        assert_eq!(sim.go_previous(), MoveOutcome::Boundary);
        assert_eq!(sim.current(), Some(A));
        assert!(sim.policy().events().is_empty());
        assert_eq!(sim.pages(), vec![A]);
    }

    #[test]
    fn test_boundary_keeps_ticking() {
        let mut sim = linear_ab();
        sim.advance(Duration::from_millis(4_500));

        assert_eq!(sim.pages(), vec![A, B]);
        let outcomes: Vec<_> = sim.ticks().iter().map(|t| t.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                MoveOutcome::Moved { from: A, to: B },
                MoveOutcome::Boundary,
                MoveOutcome::Boundary,
                MoveOutcome::Boundary,
            ]
        );
        assert_eq!(sim.next_deadline(), Some(SessionTime::from_millis(5_000)));
    }

    #[test]
    fn test_vetoed_ticks_keep_retrying() {
        let mut sim = vetoing();
        sim.policy().take_events();
        sim.advance(Duration::from_secs(5));

        assert_eq!(sim.ticks().len(), 5);
        assert!(sim
            .ticks()
            .iter()
            .all(|t| t.outcome == MoveOutcome::Vetoed { target: B }));
        assert_eq!(sim.pages(), vec![A]);
        assert_eq!(
            sim.policy()
                .count(|e| matches!(e, PolicyEvent::WillMove(_) | PolicyEvent::DidMove(_))),
            0
        );
        assert_eq!(
            sim.policy()
                .count(|e| matches!(e, PolicyEvent::WillStartTicking(_))),
            5
        );
    }

    #[test]
    fn test_veto_lifted_resumes_advance() {
        let mut sim = vetoing();
        sim.advance(Duration::from_millis(2_500));
        sim.policy().clear_veto();
        sim.advance(Duration::from_millis(1_000));

        assert_eq!(sim.pages(), vec![A, B]);
        assert_eq!(sim.display_times_ms(), vec![0, 3_000]);
    }

    #[test]
    fn test_reset_on_manual_move() {
        let mut sim = cyclic_abc();
        sim.at_millis(700);
        assert!(sim.go_next().is_moved());
        sim.advance(Duration::from_secs(4));

        // Ticks at 2.7s and 4.7s, not 2.0s
        assert_eq!(sim.display_times_ms(), vec![0, 700, 2_700, 4_700]);
        assert_eq!(sim.pages(), vec![A, B, C, A]);
    }

    #[test]
    fn test_debounced_resume_timing() {
        let mut sim = cyclic_abc();

        sim.at_millis(0).begin_interaction();
        sim.at_millis(100).end_interaction();
        sim.at_millis(300).begin_interaction();
        sim.at_millis(500).end_interaction();

        sim.at_millis(999);
        assert!(matches!(
            sim.snapshot().timer,
            TimerState::Suspended { .. }
        ));

        sim.at_millis(1_000);
        assert_eq!(sim.next_deadline(), Some(SessionTime::from_millis(3_000)));

        sim.at_millis(3_000);
        assert_eq!(sim.pages(), vec![A, B]);
        assert_eq!(sim.display_times_ms(), vec![0, 3_000]);
        assert_eq!(
            sim.policy()
                .count(|e| *e == PolicyEvent::WillStartTicking(Duration::from_secs(2))),
            3
        );
    }

    #[test]
    fn test_long_drag_blocks_auto_advance() {
        let mut sim = linear_ab();
        sim.at_millis(200).begin_interaction();
        for t in (300..10_000).step_by(100) {
            sim.at_millis(t).change_interaction();
        }
        sim.at_millis(10_000).end_interaction();
        sim.at_millis(10_499);
        assert_eq!(sim.pages(), vec![A]);

        sim.at_millis(11_500);
        assert_eq!(sim.display_times_ms(), vec![0, 11_500]);
    }

    #[test]
    fn test_interaction_without_interval_never_arms() {
        let mut sim = manual_ab();
        sim.begin_interaction();
        sim.at_millis(50).end_interaction();
        sim.at_millis(10_000);

        assert_eq!(sim.snapshot().timer, TimerState::Idle);
        assert!(sim.ticks().is_empty());
    }

    #[test]
    fn test_interval_change_mid_session() {
        let mut sim = manual_ab();
        sim.at_millis(250)
            .set_interval(Some(Duration::from_millis(500)));
        sim.at_millis(800);
        assert_eq!(sim.display_times_ms(), vec![0, 750]);

        sim.set_interval(None);
        sim.at_millis(5_000);
        assert_eq!(sim.ticks().len(), 1);
    }

    #[test]
    fn test_teardown_drops_pending_callbacks() {
        let mut sim = cyclic_abc();
        sim.at_millis(100).begin_interaction();
        sim.at_millis(200).end_interaction();
        sim.teardown();

        sim.at_millis(60_000);
        assert_eq!(sim.pages(), vec![A]);
        assert!(sim.ticks().is_empty());
        assert_eq!(sim.current(), None);
    }

    #[test]
    fn test_widget_transition_then_auto_advance() {
        let mut sim = cyclic_abc();
        sim.at_millis(500);
        assert!(sim.finish_transition(C, true));
        sim.at_millis(2_000);

        // The widget transition does not reset the countdown
        assert_eq!(sim.pages(), vec![A, A]);
        assert_eq!(sim.current(), Some(A));
    }

    #[test]
    fn test_empty_provider_stays_uninitialized() {
        let provider = StaticProvider::new(Vec::new()).with_interval(Duration::from_secs(1));
        let mut sim = CarouselSimulator::new(&provider, RecordingPolicy::permissive());
        sim.at_millis(10_000);

        assert!(sim.pages().is_empty());
        assert!(sim.policy().events().is_empty());
        assert_eq!(sim.go_next(), MoveOutcome::Uninitialized);
    }

    proptest! {
        #[test]
        fn prop_veto_idempotence(steps in proptest::collection::vec(any::<bool>(), 1..40)) {
            let mut sim = vetoing();
            for (i, forward) in steps.into_iter().enumerate() {
                sim.at_millis(i as u64 * 333);
                if forward { sim.go_next(); } else { sim.go_previous(); }
                prop_assert_eq!(sim.current(), Some(A));
            }
            prop_assert_eq!(sim.pages(), vec![A]);
            prop_assert_eq!(sim.policy().did_moves(), vec![A]);
        }

        #[test]
        fn prop_reset_on_move(move_at in 1u64..2_000) {
            let mut sim = cyclic_abc();
            sim.at_millis(move_at);
            sim.go_next();
            sim.advance(Duration::from_secs(4));

            let times = sim.display_times_ms();
            prop_assert_eq!(times, vec![0, move_at, move_at + 2_000, move_at + 4_000]);
        }

        #[test]
        fn prop_single_resume_after_last_end(gaps in proptest::collection::vec(1u64..499, 1..10)) {
            // Bursts separated by gaps shorter than the quiet period
            let mut sim = linear_ab();
            let mut t = 100;
            for gap in gaps {
                sim.at_millis(t).begin_interaction();
                sim.at_millis(t + 10).end_interaction();
                t += 10 + gap;
            }
            let last_end = t;
            sim.at_millis(last_end).begin_interaction();
            sim.at_millis(last_end + 10).end_interaction();

            sim.at_millis(last_end + 10 + 499);
            let suspended = matches!(sim.snapshot().timer, TimerState::Suspended { .. });
            prop_assert!(suspended);
            sim.at_millis(last_end + 10 + 500);
            prop_assert_eq!(
                sim.next_deadline(),
                Some(SessionTime::from_millis(last_end + 10 + 1_500))
            );
        }
    }
}
