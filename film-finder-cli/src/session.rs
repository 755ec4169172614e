//! The interactive session: a loop over menu screens.
//!
//! Every screen returns the next one. Catalog failures and empty results
//! are reported and lead back to a menu; only an account store failure
//! ends the session with an error.

use std::num::NonZeroUsize;
use std::time::Instant;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use film_finder_core::{FilmSearch, RetryHint, SearchError, YearFilter};
use film_finder_db::{AccountError, AccountStore, SqliteCatalog};
use film_finder_history::{Analytics, AuditStore, LastQuerySlot, TopQueries};
use film_finder_lib::{
    Console, Disposition, Execution, ExecutionError, ExecutionOutcome, Paginator, QueryExecutor,
    Settings,
};

use crate::CliError;
use crate::console::TerminalConsole;
use crate::input::{check_year_bounds, parse_years, parse_yes_no, pick_genre};
use crate::render::{print_top_queries, render_films};
use crate::spinner::Spinner;

/// Failed password attempts allowed per log-in.
const MAX_LOGIN_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    Title,
    Year,
    Actor,
    Genre,
    GenreYear,
}

impl From<RetryHint> for SearchKind {
    fn from(hint: RetryHint) -> Self {
        match hint {
            RetryHint::Actor => Self::Actor,
            RetryHint::Title => Self::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Welcome,
    CreateAccount,
    LogIn,
    MainMenu,
    About,
    SearchMenu,
    Search(SearchKind),
    PreviousQuery,
    TopQueries,
    DeleteHistory,
    Exit,
}

/// Open the history store and attach the last-query slot when its
/// directory is usable. Never fails; problems are logged and the missing
/// feature is disabled.
pub(crate) fn open_history(settings: &Settings) -> AuditStore {
    let history = AuditStore::connect(&settings.history_path, settings.history_capacity);
    match LastQuerySlot::in_dir(&settings.last_query_dir) {
        Ok(slot) => history.with_last_query_slot(slot),
        Err(e) => {
            log::warn!("{}. The previous query will not be remembered.", e);
            history
        }
    }
}

/// Run an interactive session until the user exits.
pub(crate) fn run_session(settings: Settings, skip_login: bool, quiet: bool) -> Result<(), CliError> {
    let spinner = Spinner::start("Connecting to the account store...", quiet);
    let accounts = AccountStore::open(&settings.accounts_path);
    spinner.finish();
    let accounts = accounts.map_err(|e| CliError::account_store(e.to_string()))?;

    if !settings.catalog_path.is_file() {
        log::warn!(
            "No catalog database found at {}. Run 'film-finder catalog init --demo' to create one.",
            settings.catalog_path.display()
        );
    }

    let mut session = Session {
        catalog: SqliteCatalog::new(settings.catalog_path.clone()),
        history: open_history(&settings),
        accounts,
        console: TerminalConsole::stdio(),
        user: None,
        started: Instant::now(),
        quiet,
        settings,
    };

    session.history.begin_session();
    let first = if skip_login {
        Screen::MainMenu
    } else {
        Screen::Welcome
    };
    let result = session.run(first);
    session.history.end_session();
    session.farewell();
    result
}

struct Session {
    settings: Settings,
    catalog: SqliteCatalog,
    history: AuditStore,
    accounts: AccountStore,
    console: TerminalConsole,
    user: Option<String>,
    started: Instant,
    quiet: bool,
}

fn account_failure(e: AccountError) -> CliError {
    CliError::account_store(e.to_string())
}

impl Session {
    fn run(&mut self, mut screen: Screen) -> Result<(), CliError> {
        while screen != Screen::Exit {
            log::debug!("Screen: {:?}", screen);
            screen = match screen {
                Screen::Welcome => self.welcome(),
                Screen::CreateAccount => self.create_account()?,
                Screen::LogIn => self.log_in()?,
                Screen::MainMenu => self.main_menu(),
                Screen::About => self.about(),
                Screen::SearchMenu => self.search_menu(),
                Screen::Search(kind) => self.search(kind),
                Screen::PreviousQuery => self.previous_query(),
                Screen::TopQueries => self.top_queries(),
                Screen::DeleteHistory => self.delete_history(),
                Screen::Exit => Screen::Exit,
            };
        }
        Ok(())
    }

    /// Show a numbered menu and return the chosen entry (1-based).
    fn menu(&mut self, title: &str, entries: &[&str]) -> Option<usize> {
        self.console.say("");
        self.console.say(title.if_supports_color(Stdout, |t| t.bold()));
        for (i, entry) in entries.iter().enumerate() {
            self.console
                .say(format!("{}. {}", i + 1, entry).if_supports_color(Stdout, |t| t.bright_cyan()));
        }
        loop {
            let input = self.console.prompt("Enter your choice: ")?;
            match input.parse::<usize>() {
                Ok(n) if (1..=entries.len()).contains(&n) => return Some(n),
                _ => self
                    .console
                    .error(&format!("Invalid choice: {:?}", input)),
            }
        }
    }

    /// Ask a yes/no question until answered.
    fn confirm(&mut self, question: &str) -> Option<bool> {
        loop {
            let input = self.console.prompt(question)?;
            match parse_yes_no(&input) {
                Some(answer) => return Some(answer),
                None => self.console.error("Please answer y or n."),
            }
        }
    }

    fn welcome(&mut self) -> Screen {
        match self.menu(
            "Welcome to film-finder!",
            &["Create an account", "Log in", "Exit"],
        ) {
            Some(1) => Screen::CreateAccount,
            Some(2) => Screen::LogIn,
            _ => Screen::Exit,
        }
    }

    fn create_account(&mut self) -> Result<Screen, CliError> {
        let Some(username) = self.console.prompt("Choose a username: ") else {
            return Ok(Screen::Exit);
        };
        let Some(password) = self.console.prompt("Choose a password: ") else {
            return Ok(Screen::Exit);
        };
        match self.accounts.create_user(&username, &password) {
            Ok(()) => {
                self.console.say(format!(
                    "{} Account created. Welcome, {}!",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    username
                ));
                self.user = Some(username);
                Ok(Screen::MainMenu)
            }
            Err(e @ AccountError::Sqlite(_)) => Err(account_failure(e)),
            Err(e) => {
                self.console.error(&e.to_string());
                Ok(Screen::Welcome)
            }
        }
    }

    fn log_in(&mut self) -> Result<Screen, CliError> {
        let Some(username) = self.console.prompt("Username: ") else {
            return Ok(Screen::Exit);
        };
        if !self.accounts.user_exists(&username).map_err(account_failure)? {
            self.console
                .error(&format!("There is no account named {:?}.", username));
            return Ok(Screen::Welcome);
        }

        for attempt in 1..=MAX_LOGIN_ATTEMPTS {
            let Some(password) = self.console.prompt("Password: ") else {
                return Ok(Screen::Exit);
            };
            let spinner = Spinner::start("Logging in...", self.quiet);
            let verified = self.accounts.verify(&username, &password);
            spinner.finish();
            if verified.map_err(account_failure)? {
                self.console.say(format!("Welcome back, {}!", username));
                self.user = Some(username);
                return Ok(Screen::MainMenu);
            }
            self.console.error(&format!(
                "Wrong password ({} of {} attempts).",
                attempt, MAX_LOGIN_ATTEMPTS
            ));
        }
        Ok(Screen::Welcome)
    }

    fn main_menu(&mut self) -> Screen {
        match self.menu(
            "Main menu",
            &[
                "About film-finder",
                "Search films",
                "Show previous query",
                "Top searches",
                "Delete search history",
                "Exit",
            ],
        ) {
            Some(1) => Screen::About,
            Some(2) => Screen::SearchMenu,
            Some(3) => Screen::PreviousQuery,
            Some(4) => Screen::TopQueries,
            Some(5) => Screen::DeleteHistory,
            _ => Screen::Exit,
        }
    }

    fn about(&mut self) -> Screen {
        let capacity = self.history.capacity();
        self.console.say("");
        self.console.say("About".if_supports_color(Stdout, |t| t.bold()));
        self.console
            .say("film-finder searches a film catalog by title, release year, actor and genre.");
        self.console.say(format!(
            "Your last {} searches are kept so you can look at the previous query",
            capacity
        ));
        self.console.say("or see which searches you run most often.");
        Screen::MainMenu
    }

    fn search_menu(&mut self) -> Screen {
        match self.menu(
            "Search films",
            &[
                "By title",
                "By year or range of years",
                "By actor",
                "By genre",
                "By genre and year",
                "Back to main menu",
                "Exit",
            ],
        ) {
            Some(1) => Screen::Search(SearchKind::Title),
            Some(2) => Screen::Search(SearchKind::Year),
            Some(3) => Screen::Search(SearchKind::Actor),
            Some(4) => Screen::Search(SearchKind::Genre),
            Some(5) => Screen::Search(SearchKind::GenreYear),
            Some(6) => Screen::MainMenu,
            _ => Screen::Exit,
        }
    }

    fn search(&mut self, kind: SearchKind) -> Screen {
        match self.build_search(kind) {
            Ok(search) => {
                let mut paginator = Paginator::new(&mut self.console, render_films);
                let execution = QueryExecutor::new(&self.catalog, &mut self.history)
                    .search(&search, &mut paginator);
                self.follow(execution)
            }
            Err(next) => next,
        }
    }

    /// Prompt for the inputs of one search family. `Err` carries the
    /// screen to go to instead.
    fn build_search(&mut self, kind: SearchKind) -> Result<FilmSearch, Screen> {
        match kind {
            SearchKind::Title => {
                self.ask_search("Enter a film title (or part of it): ", FilmSearch::title)
            }
            SearchKind::Actor => self.ask_search(
                "Enter the actor's name (or its beginning): ",
                FilmSearch::actor,
            ),
            SearchKind::Year => Ok(FilmSearch::Year(self.ask_years()?)),
            SearchKind::Genre => {
                let genre = self.ask_genre()?;
                FilmSearch::genre(&genre).map_err(|_| Screen::SearchMenu)
            }
            SearchKind::GenreYear => {
                let genre = self.ask_genre()?;
                let years = self.ask_years()?;
                FilmSearch::genre_year(&genre, years).map_err(|_| Screen::SearchMenu)
            }
        }
    }

    fn ask_search(
        &mut self,
        message: &str,
        build: fn(&str) -> Result<FilmSearch, SearchError>,
    ) -> Result<FilmSearch, Screen> {
        loop {
            let input = self.console.prompt(message).ok_or(Screen::Exit)?;
            match build(&input) {
                Ok(search) => return Ok(search),
                Err(e) => self.console.error(&e.to_string()),
            }
        }
    }

    fn ask_years(&mut self) -> Result<YearFilter, Screen> {
        let bounds = self.lookup(|executor| executor.year_bounds())?;
        if let Some((min, max)) = bounds {
            self.console
                .notice(&format!("Films in the catalog span {} to {}.", min, max));
        }
        loop {
            let input = self
                .console
                .prompt("Enter a year or a range (e.g. 1999 or 1998-2003): ")
                .ok_or(Screen::Exit)?;
            match parse_years(&input)
                .and_then(|years| check_year_bounds(years, bounds).map(|()| years))
            {
                Ok(years) => return Ok(years),
                Err(msg) => self.console.error(&msg),
            }
        }
    }

    fn ask_genre(&mut self) -> Result<String, Screen> {
        let genres = self.lookup(|executor| executor.genres())?;
        if genres.is_empty() {
            self.console.error("The catalog has no genres.");
            return Err(Screen::SearchMenu);
        }
        for (i, genre) in genres.iter().enumerate() {
            self.console.say(format!("{:>3}. {}", i + 1, genre));
        }
        loop {
            let input = self
                .console
                .prompt("Pick a genre by number or name: ")
                .ok_or(Screen::Exit)?;
            match pick_genre(&input, &genres) {
                Some(genre) => return Ok(genre.to_string()),
                None => self.console.error(&format!("Unknown genre: {:?}", input)),
            }
        }
    }

    /// Run an unlogged helper query. Failures are reported and lead to the
    /// main menu.
    fn lookup<T>(
        &mut self,
        f: impl FnOnce(&mut QueryExecutor<'_, SqliteCatalog>) -> Result<T, ExecutionError>,
    ) -> Result<T, Screen> {
        let spinner = Spinner::start("Querying the catalog...", self.quiet);
        let result = f(&mut QueryExecutor::new(&self.catalog, &mut self.history));
        spinner.finish();
        result.map_err(|e| {
            self.report_failure(&e);
            Screen::MainMenu
        })
    }

    fn report_failure(&mut self, error: &ExecutionError) {
        self.console
            .error(&format!("Something went wrong: {}", error));
    }

    /// Act on an execution's disposition.
    fn follow(&mut self, execution: Execution) -> Screen {
        match execution.disposition {
            Disposition::RetrySearch(hint) => {
                self.console.notice("No films found.");
                match self.confirm("Would you like to try again? (y/n): ") {
                    Some(true) => Screen::Search(hint.into()),
                    Some(false) => Screen::SearchMenu,
                    None => Screen::Exit,
                }
            }
            Disposition::SearchMenu => {
                if matches!(execution.outcome, ExecutionOutcome::Empty) {
                    self.console.notice("No films found.");
                }
                Screen::SearchMenu
            }
            Disposition::MainMenu => {
                if let ExecutionOutcome::Failure(e) = &execution.outcome {
                    self.report_failure(e);
                }
                Screen::MainMenu
            }
            Disposition::ShowResults => {
                render_films(execution.outcome.rows(), None);
                Screen::SearchMenu
            }
            Disposition::Exit => Screen::Exit,
        }
    }

    fn previous_query(&mut self) -> Screen {
        let Some(text) = self.history.read_last_query() else {
            self.console.notice("There is no previous query.");
            return Screen::MainMenu;
        };
        self.console.say("");
        self.console
            .say("Your previous query:".if_supports_color(Stdout, |t| t.bold()));
        self.console.say(&text);

        if !self.settings.replay_enabled {
            return Screen::MainMenu;
        }
        let Some(last) = self.history.last_query() else {
            return Screen::MainMenu;
        };
        match self.confirm("Run it again? (y/n): ") {
            Some(true) => {}
            Some(false) => return Screen::MainMenu,
            None => return Screen::Exit,
        }

        let mut paginator = Paginator::new(&mut self.console, render_films);
        let execution =
            QueryExecutor::new(&self.catalog, &mut self.history).replay(&last, &mut paginator);
        self.follow(execution)
    }

    fn top_queries(&mut self) -> Screen {
        let n = loop {
            let Some(input) = self
                .console
                .prompt("How many top searches would you like to see? ")
            else {
                return Screen::Exit;
            };
            match input.parse::<usize>().ok().and_then(NonZeroUsize::new) {
                Some(n) => break n,
                None => self.console.error("Enter a positive whole number."),
            }
        };

        match Analytics::new(&self.history).top_n(n) {
            TopQueries::Ranked(top) => {
                if let Err(e) = print_top_queries(self.console.out(), &top) {
                    log::warn!("Failed to write results: {}", e);
                }
            }
            TopQueries::HistoryEmpty => self.console.notice("History is empty."),
            TopQueries::Unavailable => self
                .console
                .error("Search history is unavailable in this session."),
        }
        Screen::MainMenu
    }

    fn delete_history(&mut self) -> Screen {
        if !self.history.is_connected() {
            self.console
                .error("Search history is unavailable in this session.");
            return Screen::MainMenu;
        }
        match self.confirm("Delete your whole search history? (y/n): ") {
            Some(true) => {
                self.history.clear();
                self.console.say(format!(
                    "{} History deleted",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                ));
                Screen::MainMenu
            }
            Some(false) => Screen::MainMenu,
            None => Screen::Exit,
        }
    }

    fn farewell(&mut self) {
        let elapsed = self.started.elapsed().as_secs();
        let name = self
            .user
            .as_deref()
            .map(|u| format!(", {}", u))
            .unwrap_or_default();
        self.console.say("");
        self.console.say(format!(
            "Goodbye{}! You spent {} min {} s with film-finder.",
            name,
            elapsed / 60,
            elapsed % 60
        ));
    }
}
