//! Results and navigation signals returned to the menu layer.

use film_finder_core::{RenderError, RetryHint, Row};
use film_finder_db::CatalogError;
use thiserror::Error;

/// A failed catalog operation. Never logged, never retried automatically.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Database error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Render(#[from] RenderError),
}

/// What a query produced.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Success(Vec<Row>),
    /// The query ran and matched nothing. Not an error.
    Empty,
    Failure(ExecutionError),
}

impl ExecutionOutcome {
    pub fn rows(&self) -> &[Row] {
        match self {
            Self::Success(rows) => rows,
            _ => &[],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Where the caller should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Rows were returned directly; the caller shows them.
    ShowResults,
    /// Nothing matched; re-prompt the same search family.
    RetrySearch(RetryHint),
    SearchMenu,
    MainMenu,
    Exit,
}

/// The terminal choice offered after paging through results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationChoice {
    NewSearch,
    MainMenu,
    Exit,
}

impl NavigationChoice {
    /// Parse the numbered menu entry (`1`, `2` or `3`).
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::NewSearch),
            "2" => Some(Self::MainMenu),
            "3" => Some(Self::Exit),
            _ => None,
        }
    }
}

impl From<NavigationChoice> for Disposition {
    fn from(choice: NavigationChoice) -> Self {
        match choice {
            NavigationChoice::NewSearch => Self::SearchMenu,
            NavigationChoice::MainMenu => Self::MainMenu,
            NavigationChoice::Exit => Self::Exit,
        }
    }
}

/// Outcome of one execution together with the caller's next step.
#[derive(Debug)]
pub struct Execution {
    pub outcome: ExecutionOutcome,
    pub disposition: Disposition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_choices_map_to_dispositions() {
        assert_eq!(
            Disposition::from(NavigationChoice::NewSearch),
            Disposition::SearchMenu
        );
        assert_eq!(
            Disposition::from(NavigationChoice::MainMenu),
            Disposition::MainMenu
        );
        assert_eq!(Disposition::from(NavigationChoice::Exit), Disposition::Exit);
    }

    #[test]
    fn navigation_input() {
        assert_eq!(NavigationChoice::from_input(" 1 "), Some(NavigationChoice::NewSearch));
        assert_eq!(NavigationChoice::from_input("4"), None);
        assert_eq!(NavigationChoice::from_input(""), None);
    }
}
