//! Collaborator contracts consumed by the navigation core
//!
//! Every optional capability has a stated default, so an absent or partial
//! collaborator behaves permissively:
//! - `PageProvider::is_cyclic` -> `false`
//! - `PageProvider::swipe_interval` -> `None` (no auto-advance)
//! - `MovePolicy::should_move` -> `true`
//! - `MovePolicy::will_move` / `did_move` / `will_start_ticking` -> no-op

use std::time::Duration;

use crate::PageId;

/// Supplies the page sequence and navigation options at setup time
pub trait PageProvider {
    /// Ordered pages; insertion order is navigation order
    fn pages(&self) -> Vec<PageId>;

    /// Whether navigation wraps around. Default: `false`
    fn is_cyclic(&self) -> bool {
        false
    }

    /// Auto-swipe interval. Default: `None`
    fn swipe_interval(&self) -> Option<Duration> {
        None
    }
}

/// External observer able to veto and observe every move.
///
/// The navigation core holds only a non-owning link to its policy; methods
/// take `&self` so implementations keep their own interior state.
pub trait MovePolicy: Send + Sync {
    /// Veto hook, asked before every move attempt (manual or automatic).
    /// Default: `true`
    fn should_move(&self, from: PageId, to: PageId) -> bool {
        let _ = (from, to);
        true
    }

    /// Called before a committed move, including the initial display
    fn will_move(&self, to: PageId) {
        let _ = to;
    }

    /// Called after a committed move, including the initial display
    fn did_move(&self, to: PageId) {
        let _ = to;
    }

    /// Called whenever the auto-advance timer (re)arms
    fn will_start_ticking(&self, interval: Duration) {
        let _ = interval;
    }
}

/// Policy that allows every move and observes nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct PermissivePolicy;

impl MovePolicy for PermissivePolicy {}

/// Render sink: shows a page. Called exactly once per committed move; the
/// core never waits for the transition to finish.
pub trait DisplaySink {
    /// `direction` is `None` for the initial page of a session
    fn display(&mut self, page: PageId, direction: Option<crate::Direction>);
}

impl<T: DisplaySink + ?Sized> DisplaySink for Box<T> {
    fn display(&mut self, page: PageId, direction: Option<crate::Direction>) {
        (**self).display(page, direction)
    }
}

/// Provider backed by a fixed list, mostly useful for tests and demos
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
    pub pages: Vec<PageId>,
    pub cyclic: bool,
    pub interval: Option<Duration>,
}

impl StaticProvider {
    pub fn new(pages: impl IntoIterator<Item = PageId>) -> Self {
        StaticProvider {
            pages: pages.into_iter().collect(),
            cyclic: false,
            interval: None,
        }
    }

    pub fn cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }
}

impl PageProvider for StaticProvider {
    fn pages(&self) -> Vec<PageId> {
        self.pages.clone()
    }

    fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    fn swipe_interval(&self) -> Option<Duration> {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Direction;

    struct BareProvider;

    impl PageProvider for BareProvider {
        fn pages(&self) -> Vec<PageId> {
            vec![PageId(1)]
        }
    }

    #[test]
    fn test_provider_defaults() {
        let provider = BareProvider;
        assert!(!provider.is_cyclic());
        assert_eq!(provider.swipe_interval(), None);
    }

    #[test]
    fn test_permissive_policy_allows_everything() {
        let policy = PermissivePolicy;
        assert!(policy.should_move(PageId(1), PageId(2)));
        assert!(policy.should_move(PageId(2), PageId(2)));
    }

    #[derive(Default)]
    struct VecSink(Vec<(PageId, Option<Direction>)>);

    impl DisplaySink for VecSink {
        fn display(&mut self, page: PageId, direction: Option<Direction>) {
            self.0.push((page, direction));
        }
    }

    #[test]
    fn test_boxed_display_sink_forwards() {
        let mut sink: Box<VecSink> = Box::default();
        sink.display(PageId(3), Some(Direction::Next));
        assert_eq!(sink.0, vec![(PageId(3), Some(Direction::Next))]);
    }

    #[test]
    fn test_static_provider_builder() {
        let provider = StaticProvider::new([PageId(1), PageId(2)])
            .cyclic(true)
            .with_interval(Duration::from_secs(2));

        assert_eq!(provider.pages(), vec![PageId(1), PageId(2)]);
        assert!(provider.is_cyclic());
        assert_eq!(provider.swipe_interval(), Some(Duration::from_secs(2)));
    }
}
