//! Core types for film-finder.
//!
//! Parameterized query templates, scalar values, the display renderer and
//! the structured search families shared by the catalog driver, the audit
//! history and the CLI.

pub mod error;
pub mod film;
pub mod render;
pub mod scaffold;
pub mod search;
pub mod sqlfmt;
pub mod template;
pub mod value;

pub use error::{RenderError, SearchError};
pub use film::FilmRow;
pub use render::QueryRenderer;
pub use scaffold::{ACTORS_TABLE_CTE, MAIN_TABLE_CTE};
pub use search::{FilmSearch, RetryHint, SearchQuery, YearFilter, genres_query, year_bounds_query};
pub use template::QueryTemplate;
pub use value::{ParamMap, Row, SqlValue};
