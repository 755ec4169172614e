//! Interactive, page-by-page display of query results.

use film_finder_core::{RetryHint, Row};

use crate::console::Console;
use crate::executor::ResultPresenter;
use crate::outcome::NavigationChoice;
use crate::pager::{PageCommand, Pager, parse_page_size};

/// Pages through rows with a caller-supplied renderer, then asks where to
/// go next.
///
/// The renderer draws one page; the paginator handles page size, navigation
/// and the terminal menu. End of input is treated as a request to exit.
pub struct Paginator<'c, C: ?Sized, R> {
    console: &'c mut C,
    render: R,
}

impl<'c, C, R> Paginator<'c, C, R>
where
    C: Console + ?Sized,
    R: FnMut(&[Row], Option<RetryHint>),
{
    pub fn new(console: &'c mut C, render: R) -> Self {
        Self { console, render }
    }

    pub fn paginate(&mut self, rows: &[Row], hint: Option<RetryHint>) -> NavigationChoice {
        self.console
            .notice(&format!("There are {} results.", rows.len()));

        let Some(page_size) = self.ask_page_size(rows.len()) else {
            return NavigationChoice::Exit;
        };
        let mut pager = Pager::new(rows.len(), page_size);

        loop {
            self.console.notice(&format!(
                "Showing page {} of {}",
                pager.current() + 1,
                pager.total_pages()
            ));
            (self.render)(pager.page(rows), hint);

            if pager.total_pages() == 1 {
                break;
            }
            match self.ask_command(&pager) {
                Some(PageCommand::Next) => {
                    pager.next();
                }
                Some(PageCommand::Previous) => {
                    pager.prev();
                }
                Some(PageCommand::Quit) => break,
                None => return NavigationChoice::Exit,
            }
        }

        self.ask_navigation()
    }

    fn ask_page_size(&mut self, available: usize) -> Option<std::num::NonZeroUsize> {
        loop {
            let input = self
                .console
                .prompt("How many elements per page would you like to see? ")?;
            match parse_page_size(&input, available) {
                Ok(size) => return Some(size),
                Err(e) => self.console.error(&e.to_string()),
            }
        }
    }

    /// Read a command that can be applied at the current position.
    fn ask_command(&mut self, pager: &Pager) -> Option<PageCommand> {
        loop {
            let input = self.console.prompt("n - next, p - prev, q - quit: ")?;
            match PageCommand::parse(&input) {
                None => self.console.error("Invalid input!"),
                Some(PageCommand::Next) if pager.is_last() => self
                    .console
                    .error("The last page does not have a next page!"),
                Some(PageCommand::Previous) if pager.is_first() => self
                    .console
                    .error("The first page does not have a previous page!"),
                Some(command) => return Some(command),
            }
        }
    }

    fn ask_navigation(&mut self) -> NavigationChoice {
        self.console.notice("1. Find another film");
        self.console.notice("2. Back to menu");
        self.console.notice("3. Exit");
        loop {
            let Some(input) = self.console.prompt("Enter your choice: ") else {
                return NavigationChoice::Exit;
            };
            match NavigationChoice::from_input(&input) {
                Some(choice) => return choice,
                None => self
                    .console
                    .error(&format!("Invalid choice: {:?}", input)),
            }
        }
    }
}

impl<C, R> ResultPresenter for Paginator<'_, C, R>
where
    C: Console + ?Sized,
    R: FnMut(&[Row], Option<RetryHint>),
{
    fn present(&mut self, rows: &[Row], hint: Option<RetryHint>) -> NavigationChoice {
        self.paginate(rows, hint)
    }
}
