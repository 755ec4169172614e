use std::io::{self, Write};
use std::num::NonZeroUsize;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use film_finder_history::{Analytics, AuditStore, TopQueries};
use film_finder_lib::Settings;

use crate::CliError;
use crate::render::{print_record, print_top_queries};
use crate::session::open_history;

fn connected_history(settings: &Settings) -> Result<AuditStore, CliError> {
    let history = open_history(settings);
    if !history.is_connected() {
        return Err(CliError::history(format!(
            "Cannot open history database at {}",
            settings.history_path.display()
        )));
    }
    Ok(history)
}

pub(crate) fn run_history_list(settings: &Settings) -> Result<(), CliError> {
    let history = connected_history(settings)?;
    let records = history.records();
    if records.is_empty() {
        log::info!("History is empty.");
        return Ok(());
    }

    log::info!(
        "{}",
        format!(
            "Query history ({} of {} kept)",
            records.len(),
            history.capacity()
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    let mut out = io::stdout().lock();
    for (i, record) in records.iter().enumerate() {
        print_record(&mut out, i + 1, record)?;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn run_history_last(settings: &Settings) -> Result<(), CliError> {
    let history = open_history(settings);
    match history.read_last_query() {
        Some(text) => log::info!("{}", text),
        None => log::info!("There is no previous query."),
    }
    Ok(())
}

pub(crate) fn run_history_clear(settings: &Settings) -> Result<(), CliError> {
    let mut history = connected_history(settings)?;
    history.clear();
    log::info!(
        "{} History deleted",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
    );
    Ok(())
}

pub(crate) fn run_history_top(settings: &Settings, count: usize) -> Result<(), CliError> {
    let n = NonZeroUsize::new(count)
        .ok_or_else(|| CliError::invalid_argument("Count must be at least 1"))?;
    let history = connected_history(settings)?;
    match Analytics::new(&history).top_n(n) {
        TopQueries::Ranked(top) => print_top_queries(&mut io::stdout().lock(), &top)?,
        TopQueries::HistoryEmpty => log::info!("History is empty."),
        TopQueries::Unavailable => {
            return Err(CliError::history("Search history is unavailable"));
        }
    }
    Ok(())
}
