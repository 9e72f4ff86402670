//! Resolved viewport value.
//!
//! Guarantees:
//! * `class` is `breakpoints.classify(width)` for the tables it was resolved with.
//! * `page_size` is the table entry for `class`, so always >= 1.

use crate::{Breakpoints, PageSizeTable, ViewportClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub class: ViewportClass,
    pub page_size: usize,
}

impl Viewport {
    pub fn resolve(width: u32, breakpoints: &Breakpoints, pages: &PageSizeTable) -> Self {
        let class = breakpoints.classify(width);
        Self {
            width,
            class,
            page_size: pages.get(class),
        }
    }

    /// Largest valid first-visible index for `item_count` cards.
    pub fn max_index(&self, item_count: usize) -> usize {
        item_count.saturating_sub(self.page_size)
    }

    /// Whether all `item_count` cards fit without scrolling.
    pub fn fits(&self, item_count: usize) -> bool {
        item_count <= self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_class_and_page_size() {
        let vp = Viewport::resolve(900, &Breakpoints::default(), &PageSizeTable::default());
        assert_eq!(vp.width, 900);
        assert_eq!(vp.class, ViewportClass::M);
        assert_eq!(vp.page_size, 3);
    }

    #[test]
    fn max_index_saturates() {
        let vp = Viewport::resolve(1440, &Breakpoints::default(), &PageSizeTable::default());
        assert_eq!(vp.max_index(10), 6);
        assert_eq!(vp.max_index(4), 0);
        assert_eq!(vp.max_index(0), 0);
        assert!(vp.fits(4));
        assert!(!vp.fits(5));
    }
}
