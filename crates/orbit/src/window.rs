use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::ops::Range;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page size must be at least 1")]
pub struct PageSizeError;

/// Number of cards that may be materialized at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(NonZeroUsize::MIN.saturating_add(DEFAULT_PAGE_SIZE - 1))
    }
}

impl TryFrom<usize> for PageSize {
    type Error = PageSizeError;

    fn try_from(size: usize) -> Result<Self, Self::Error> {
        Self::new(size).ok_or(PageSizeError)
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

pub fn page_of(cursor: usize, page_size: PageSize) -> usize {
    cursor / page_size.get()
}

pub fn page_count(len: usize, page_size: PageSize) -> usize {
    len.div_ceil(page_size.get())
}

/// The window containing `cursor`. An empty list yields [`PageWindow::EMPTY`].
pub fn select_window(len: usize, cursor: usize, page_size: PageSize) -> PageWindow {
    if len == 0 {
        return PageWindow::EMPTY;
    }
    let start = page_of(cursor, page_size) * page_size.get();
    PageWindow {
        start,
        end: (start + page_size.get()).min(len),
    }
}

/// Wraps any signed target onto `[0, len)`. Returns `None` for an empty list.
pub fn wrap_index(target: isize, len: usize) -> Option<usize> {
    let len = isize::try_from(len).ok().filter(|&l| l > 0)?;
    Some(target.rem_euclid(len) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> PageSize {
        PageSize::new(n).unwrap()
    }

    #[test]
    fn test_window_contains_cursor() {
        for page_size in 1..=9 {
            for len in 1..=30 {
                for cursor in 0..len {
                    let window = select_window(len, cursor, size(page_size));
                    assert!(window.len() <= page_size);
                    assert!(window.contains(cursor), "{len} {cursor} {page_size}");
                    assert_eq!(window.start % page_size, 0);
                }
            }
        }
    }

    #[test]
    fn test_window_last_page_is_short() {
        assert_eq!(
            select_window(20, 17, size(8)),
            PageWindow { start: 16, end: 20 }
        );
        assert_eq!(select_window(20, 8, size(8)).range(), 8..16);
    }

    #[test]
    fn test_empty_list_has_empty_window() {
        let window = select_window(0, 0, size(8));
        assert!(window.is_empty());
        assert_eq!(window, PageWindow::EMPTY);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, size(8)), 0);
        assert_eq!(page_count(8, size(8)), 1);
        assert_eq!(page_count(20, size(8)), 3);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(-1, 20), Some(19));
        assert_eq!(wrap_index(20, 20), Some(0));
        assert_eq!(wrap_index(23, 20), Some(3));
        assert_eq!(wrap_index(5, 0), None);
    }

    #[test]
    fn test_page_size_rejects_zero() {
        assert_eq!(PageSize::try_from(0), Err(PageSizeError));
        assert_eq!(PageSize::default().get(), DEFAULT_PAGE_SIZE);
        let parsed: Result<PageSize, _> = serde_json::from_str("0");
        assert!(parsed.is_err());
        let parsed: PageSize = serde_json::from_str("4").unwrap();
        assert_eq!(parsed.get(), 4);
    }
}
