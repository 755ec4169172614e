//! Page arithmetic and input parsing for paginated results.

use std::num::NonZeroUsize;
use std::ops::Range;

use thiserror::Error;

/// Why a page size was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageSizeError {
    #[error("The field can't be empty.")]
    Empty,
    #[error("Page size must be an integer.")]
    NotANumber(String),
    #[error("You can't show 0 results per page!")]
    Zero,
    #[error("You can't get {requested} elements per page, because you only have {available} rows.")]
    TooLarge { requested: usize, available: usize },
}

/// Parse a page size for `available` rows. Valid sizes are `1..=available`.
pub fn parse_page_size(input: &str, available: usize) -> Result<NonZeroUsize, PageSizeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PageSizeError::Empty);
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(PageSizeError::NotANumber(input.to_string()));
    }
    // All digits: the only parse failure left is overflow, which is too large anyway.
    let requested = input.parse::<usize>().unwrap_or(usize::MAX);
    let size = NonZeroUsize::new(requested).ok_or(PageSizeError::Zero)?;
    if requested > available {
        return Err(PageSizeError::TooLarge {
            requested,
            available,
        });
    }
    Ok(size)
}

/// A navigation command typed while paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCommand {
    Next,
    Previous,
    Quit,
}

impl PageCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Position within a paged result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    total: usize,
    page_size: usize,
    current: usize,
}

impl Pager {
    pub fn new(total: usize, page_size: NonZeroUsize) -> Self {
        Self {
            total,
            page_size: page_size.get(),
            current: 0,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Zero-based index of the current page.
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.total_pages()
    }

    /// Row index range of the current page.
    pub fn page_bounds(&self) -> Range<usize> {
        let start = (self.current * self.page_size).min(self.total);
        let end = (start + self.page_size).min(self.total);
        start..end
    }

    pub fn page<'r, T>(&self, rows: &'r [T]) -> &'r [T] {
        let bounds = self.page_bounds();
        &rows[bounds.start.min(rows.len())..bounds.end.min(rows.len())]
    }

    /// Move forward. Returns false at the last page.
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Move back. Returns false at the first page.
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn pages_reconstruct_rows() {
        for total in 1..=12usize {
            let rows: Vec<usize> = (0..total).collect();
            for page_size in 1..=total {
                let mut pager = Pager::new(total, size(page_size));
                assert_eq!(pager.total_pages(), total.div_ceil(page_size));
                let mut seen = pager.page(&rows).to_vec();
                while pager.next() {
                    seen.extend_from_slice(pager.page(&rows));
                }
                assert_eq!(seen, rows, "total={} size={}", total, page_size);
            }
        }
    }

    #[test]
    fn navigation_is_blocked_at_the_ends() {
        let mut pager = Pager::new(5, size(2));
        assert!(!pager.prev());
        assert!(pager.next());
        assert!(pager.next());
        assert_eq!(pager.page_bounds(), 4..5);
        assert!(!pager.next());
        assert!(pager.is_last());
        assert!(pager.prev());
        assert_eq!(pager.current(), 1);
    }

    #[test]
    fn single_page() {
        let pager = Pager::new(3, size(3));
        assert_eq!(pager.total_pages(), 1);
        assert!(pager.is_first() && pager.is_last());
    }

    #[test]
    fn page_size_validation() {
        assert_eq!(parse_page_size("", 5), Err(PageSizeError::Empty));
        assert_eq!(
            parse_page_size("abc", 5),
            Err(PageSizeError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            parse_page_size("-1", 5),
            Err(PageSizeError::NotANumber("-1".to_string()))
        );
        assert_eq!(parse_page_size("0", 5), Err(PageSizeError::Zero));
        assert_eq!(
            parse_page_size("6", 5),
            Err(PageSizeError::TooLarge {
                requested: 6,
                available: 5
            })
        );
        assert_eq!(parse_page_size(" 5 ", 5), Ok(size(5)));
        assert!(matches!(
            parse_page_size("99999999999999999999999", 5),
            Err(PageSizeError::TooLarge { .. })
        ));
    }

    #[test]
    fn commands() {
        assert_eq!(PageCommand::parse("N"), Some(PageCommand::Next));
        assert_eq!(PageCommand::parse("p"), Some(PageCommand::Previous));
        assert_eq!(PageCommand::parse(" q "), Some(PageCommand::Quit));
        assert_eq!(PageCommand::parse("x"), None);
    }
}
