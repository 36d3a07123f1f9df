//! Recording collaborators - policy and sink that remember every call

use std::sync::Arc;
use std::time::Duration;

use folio_core::{Direction, DisplaySink, MovePolicy, PageId};
use parking_lot::Mutex;

/// A call observed by `RecordingPolicy`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicyEvent {
    ShouldMove {
        from: PageId,
        to: PageId,
        allowed: bool,
    },
    WillMove(PageId),
    DidMove(PageId),
    WillStartTicking(Duration),
}

type VetoFn = Box<dyn Fn(PageId, PageId) -> bool + Send + Sync>;

/// Move policy that records every call and vetoes on demand
#[derive(Default)]
pub struct RecordingPolicy {
    events: Mutex<Vec<PolicyEvent>>,
    /// Returns `true` to refuse a move
    veto: Mutex<Option<VetoFn>>,
}

impl RecordingPolicy {
    /// Policy that allows everything
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Policy that refuses every move
    pub fn vetoing_all() -> Self {
        Self::vetoing(|_, _| true)
    }

    /// Policy that refuses moves matching `veto`
    pub fn vetoing(veto: impl Fn(PageId, PageId) -> bool + Send + Sync + 'static) -> Self {
        RecordingPolicy {
            events: Mutex::new(Vec::new()),
            veto: Mutex::new(Some(Box::new(veto))),
        }
    }

    pub fn set_veto(&self, veto: impl Fn(PageId, PageId) -> bool + Send + Sync + 'static) {
        *self.veto.lock() = Some(Box::new(veto));
    }

    pub fn clear_veto(&self) {
        *self.veto.lock() = None;
    }

    pub fn events(&self) -> Vec<PolicyEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events
    pub fn take_events(&self) -> Vec<PolicyEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Pages reported through `did_move`, in order
    pub fn did_moves(&self) -> Vec<PageId> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PolicyEvent::DidMove(page) => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&PolicyEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| matches(*e)).count()
    }
}

impl MovePolicy for RecordingPolicy {
    fn should_move(&self, from: PageId, to: PageId) -> bool {
        let allowed = match &*self.veto.lock() {
            Some(veto) => !veto(from, to),
            None => true,
        };
        self.events
            .lock()
            .push(PolicyEvent::ShouldMove { from, to, allowed });
        allowed
    }

    fn will_move(&self, to: PageId) {
        self.events.lock().push(PolicyEvent::WillMove(to));
    }

    fn did_move(&self, to: PageId) {
        self.events.lock().push(PolicyEvent::DidMove(to));
    }

    fn will_start_ticking(&self, interval: Duration) {
        self.events
            .lock()
            .push(PolicyEvent::WillStartTicking(interval));
    }
}

/// Display sink that records every displayed page.
///
/// Clones share the same record, so a test can keep one clone while the
/// controller owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    shown: Arc<Mutex<Vec<(PageId, Option<Direction>)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<(PageId, Option<Direction>)> {
        self.shown.lock().clone()
    }

    pub fn pages(&self) -> Vec<PageId> {
        self.shown.lock().iter().map(|(page, _)| *page).collect()
    }

    pub fn len(&self) -> usize {
        self.shown.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.lock().is_empty()
    }

    /// Entries recorded from index `from` on
    pub fn since(&self, from: usize) -> Vec<(PageId, Option<Direction>)> {
        self.shown.lock().get(from..).map(<[_]>::to_vec).unwrap_or_default()
    }
}

impl DisplaySink for RecordingSink {
    fn display(&mut self, page: PageId, direction: Option<Direction>) {
        self.shown.lock().push((page, direction));
    }
}
