//! Identity types for folio
//!
//! Pages are opaque to the navigation core: only identity and position
//! within a page set matter, so a page is a 64-bit handle.

use std::fmt;

/// Page identity - opaque handle to a displayable unit
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PageId(pub u64);

impl PageId {
    pub const ZERO: PageId = PageId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        PageId(id)
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for PageId {
    #[inline]
    fn from(id: u64) -> Self {
        PageId(id)
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_formatting() {
        let page = PageId::new(7);
        assert_eq!(format!("{:?}", page), "Page(7)");
        assert_eq!(page.to_string(), "7");
        assert_eq!(PageId::from(7), page);
    }
}
