//! Query execution and result paging for film-finder.
//!
//! Ties the catalog driver, the display renderer and the audit history
//! together behind [`QueryExecutor`], and provides the interactive
//! [`Paginator`] and shared [`Settings`] used by the CLI.

pub mod console;
pub mod executor;
pub mod outcome;
pub mod pager;
pub mod paginator;
pub mod settings;

pub use console::Console;
pub use executor::{ExecuteOptions, QueryExecutor, ResultPresenter};
pub use outcome::{Disposition, Execution, ExecutionError, ExecutionOutcome, NavigationChoice};
pub use pager::{PageCommand, PageSizeError, Pager, parse_page_size};
pub use paginator::Paginator;
pub use settings::{
    DEFAULT_HISTORY_CAPACITY, SettingOverrides, SettingSource, SettingSources, Settings,
    SettingsError, SettingsFile, data_dir, settings_path,
};
