//! Ordered page sets and the navigation rule
//!
//! A `PageSet` is fixed for the lifetime of a navigation session: insertion
//! order is navigation order, and structural changes require building a new
//! set (re-running setup).

use crate::PageId;

/// Navigation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Next,
    Previous,
}

/// Ordered, immutable sequence of pages plus the wraparound rule
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageSet {
    pages: Vec<PageId>,
    cyclic: bool,
}

impl PageSet {
    pub fn new(pages: Vec<PageId>, cyclic: bool) -> Self {
        PageSet { pages, cyclic }
    }

    /// Empty, non-cyclic set; every query returns `None`
    pub fn empty() -> Self {
        PageSet::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    #[inline]
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn pages(&self) -> &[PageId] {
        &self.pages
    }

    pub fn first(&self) -> Option<PageId> {
        self.pages.first().copied()
    }

    pub fn last(&self) -> Option<PageId> {
        self.pages.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<PageId> {
        self.pages.get(index).copied()
    }

    /// Position of the first occurrence of `page`
    pub fn position(&self, page: PageId) -> Option<usize> {
        self.pages.iter().position(|p| *p == page)
    }

    pub fn contains(&self, page: PageId) -> bool {
        self.position(page).is_some()
    }

    /// Neighbour of `of` in `direction`.
    ///
    /// Returns `None` when `of` is not in the set, when the set is empty, or
    /// when stepping past either end of a non-cyclic set. A cyclic set wraps
    /// last -> first (Next) and first -> last (Previous).
    pub fn neighbor(&self, of: PageId, direction: Direction) -> Option<PageId> {
        let index = self.position(of)?;
        let stepped = match direction {
            Direction::Next => index.checked_add(1).filter(|i| *i < self.pages.len()),
            Direction::Previous => index.checked_sub(1),
        };

        match stepped {
            Some(i) => self.get(i),
            None if self.cyclic => match direction {
                Direction::Next => self.first(),
                Direction::Previous => self.last(),
            },
            None => None,
        }
    }
}
