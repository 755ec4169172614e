//! Query execution: driver-bound execution, outcome classification and
//! audit logging.
//!
//! Execution and display rendering are separate paths. The catalog only
//! ever receives the template with its parameters bound by the driver; the
//! rendered text is produced afterwards for the audit log and the
//! last-query slot.

use film_finder_core::{
    FilmSearch, ParamMap, QueryRenderer, QueryTemplate, RenderError, RetryHint, Row, SearchQuery,
    SqlValue, genres_query, year_bounds_query,
};
use film_finder_db::{Catalog, CatalogConnection, CatalogError};
use film_finder_history::{
    AuditBackend, AuditRecord, AuditStore, LastQuery, ResultStatus, SqliteAuditBackend,
};

use crate::outcome::{Disposition, Execution, ExecutionError, ExecutionOutcome, NavigationChoice};

/// Shows a non-empty result set and returns the user's terminal choice.
pub trait ResultPresenter {
    fn present(&mut self, rows: &[Row], hint: Option<RetryHint>) -> NavigationChoice;
}

/// Per-call execution options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Return rows directly instead of handing them to the presenter.
    pub raw_result_only: bool,
    pub log_enabled: bool,
    pub search_key: Option<String>,
    pub search_value: Option<String>,
    /// Re-prompt flow to offer when nothing matches.
    pub retry: Option<RetryHint>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            raw_result_only: false,
            log_enabled: true,
            search_key: None,
            search_value: None,
            retry: None,
        }
    }
}

impl ExecuteOptions {
    /// Logged, paginated execution of a user search.
    pub fn for_search(query: &SearchQuery) -> Self {
        Self {
            search_key: Some(query.search_key.clone()),
            search_value: Some(query.search_value.clone()),
            retry: query.retry,
            ..Self::default()
        }
    }

    /// Raw rows, nothing logged. Used for helper lookups.
    pub fn raw_unlogged() -> Self {
        Self {
            raw_result_only: true,
            log_enabled: false,
            ..Self::default()
        }
    }
}

/// Executes catalog queries and records them in the audit history.
pub struct QueryExecutor<'a, C, B = SqliteAuditBackend> {
    catalog: &'a C,
    history: &'a mut AuditStore<B>,
    renderer: QueryRenderer,
}

impl<'a, C: Catalog, B: AuditBackend> QueryExecutor<'a, C, B> {
    pub fn new(catalog: &'a C, history: &'a mut AuditStore<B>) -> Self {
        Self {
            catalog,
            history,
            renderer: QueryRenderer::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: QueryRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn history(&self) -> &AuditStore<B> {
        &*self.history
    }

    /// Execute `template` and decide where the caller goes next.
    ///
    /// Non-empty results go to `presenter` unless `raw_result_only` is set.
    /// Empty results ask for a retry when the options carry a hint and fall
    /// back to the search menu otherwise. Failures send the caller to the
    /// main menu.
    pub fn execute<P: ResultPresenter + ?Sized>(
        &mut self,
        template: &QueryTemplate,
        params: &ParamMap,
        options: &ExecuteOptions,
        presenter: &mut P,
    ) -> Execution {
        let outcome = self.fetch(template, params, options);
        let disposition = match &outcome {
            ExecutionOutcome::Failure(_) => Disposition::MainMenu,
            ExecutionOutcome::Empty => options
                .retry
                .map_or(Disposition::SearchMenu, Disposition::RetrySearch),
            ExecutionOutcome::Success(_) if options.raw_result_only => Disposition::ShowResults,
            ExecutionOutcome::Success(rows) => presenter.present(rows, options.retry).into(),
        };
        Execution {
            outcome,
            disposition,
        }
    }

    /// Execute `template`, classify the result and log it when enabled.
    ///
    /// Driver failures are returned without touching the history.
    pub fn fetch(
        &mut self,
        template: &QueryTemplate,
        params: &ParamMap,
        options: &ExecuteOptions,
    ) -> ExecutionOutcome {
        // SQLite binds a missing named parameter as NULL, so check first.
        if let Err(e) = template.check_params(params) {
            log::debug!("Rejected query before execution: {}", e);
            return ExecutionOutcome::Failure(e.into());
        }

        let rows = match self.query_catalog(template, params) {
            Ok(rows) => rows,
            Err(e) => {
                log::debug!("Catalog query failed: {}", e);
                return ExecutionOutcome::Failure(e.into());
            }
        };
        log::debug!("Catalog returned {} rows", rows.len());

        let outcome = if rows.is_empty() {
            ExecutionOutcome::Empty
        } else {
            ExecutionOutcome::Success(rows)
        };

        if options.log_enabled {
            if let Err(e) = self.log_query(template, params, options, &outcome) {
                return ExecutionOutcome::Failure(e.into());
            }
        }
        outcome
    }

    fn query_catalog(
        &self,
        template: &QueryTemplate,
        params: &ParamMap,
    ) -> Result<Vec<Row>, CatalogError> {
        let mut conn = self.catalog.connect()?;
        conn.execute(template, params)
    }

    fn log_query(
        &mut self,
        template: &QueryTemplate,
        params: &ParamMap,
        options: &ExecuteOptions,
        outcome: &ExecutionOutcome,
    ) -> Result<(), RenderError> {
        let rendered = self.renderer.render(template, params)?;
        let status = if outcome.is_success() {
            ResultStatus::Success
        } else {
            ResultStatus::Failure
        };
        self.history.append(&AuditRecord::now(
            rendered.clone(),
            options.search_key.clone(),
            options.search_value.clone(),
            status,
        ));
        self.history.write_last_query(&LastQuery {
            rendered,
            template: template.clone(),
            params: params.clone(),
            retry: options.retry,
        });
        Ok(())
    }

    /// Run a validated search with logging and pagination.
    pub fn search<P: ResultPresenter + ?Sized>(
        &mut self,
        search: &FilmSearch,
        presenter: &mut P,
    ) -> Execution {
        let query = search.query();
        let options = ExecuteOptions::for_search(&query);
        self.execute(&query.template, &query.params, &options, presenter)
    }

    /// Run the stored last query again through the driver's binding, with
    /// the hint of the search it came from. Replays are not logged.
    pub fn replay<P: ResultPresenter + ?Sized>(
        &mut self,
        last: &LastQuery,
        presenter: &mut P,
    ) -> Execution {
        let options = ExecuteOptions {
            log_enabled: false,
            retry: last.retry,
            ..ExecuteOptions::default()
        };
        self.execute(&last.template, &last.params, &options, presenter)
    }

    /// Distinct genres in the catalog, sorted.
    pub fn genres(&mut self) -> Result<Vec<String>, ExecutionError> {
        match self.fetch(
            &genres_query(),
            &ParamMap::new(),
            &ExecuteOptions::raw_unlogged(),
        ) {
            ExecutionOutcome::Success(rows) => Ok(rows
                .iter()
                .filter_map(|row| row.first().and_then(SqlValue::as_text))
                .map(str::to_string)
                .collect()),
            ExecutionOutcome::Empty => Ok(Vec::new()),
            ExecutionOutcome::Failure(e) => Err(e),
        }
    }

    /// Earliest and latest release year, or `None` for an empty catalog.
    pub fn year_bounds(&mut self) -> Result<Option<(i64, i64)>, ExecutionError> {
        match self.fetch(
            &year_bounds_query(),
            &ParamMap::new(),
            &ExecuteOptions::raw_unlogged(),
        ) {
            ExecutionOutcome::Success(rows) => Ok(rows.first().and_then(|row| {
                let min = row.first()?.as_integer()?;
                let max = row.get(1)?.as_integer()?;
                Some((min, max))
            })),
            ExecutionOutcome::Empty => Ok(None),
            ExecutionOutcome::Failure(e) => Err(e),
        }
    }
}
