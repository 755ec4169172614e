//! film-finder CLI
//!
//! Interactive film catalog search with a query history.

mod cli_types;
mod commands;
mod console;
mod error;
mod input;
mod logging;
mod render;
mod session;
mod spinner;

use std::path::Path;

use clap::Parser;

use film_finder_lib::{SettingOverrides, SettingSource, SettingSources, Settings};

use cli_types::{CatalogAction, Cli, Commands, ConfigAction, HistoryAction};
pub(crate) use error::CliError;

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(2);
    }

    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring .env file: {}", e),
    }

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = SettingOverrides {
        catalog_path: cli.catalog,
        history_path: cli.history,
    };
    let (settings, sources) =
        Settings::load(&overrides).map_err(|e| CliError::config(e.to_string()))?;
    prepare_default_dirs(&settings, &sources);

    match cli.command.unwrap_or(Commands::Run { skip_login: false }) {
        Commands::Run { skip_login } => session::run_session(settings, skip_login, cli.quiet),
        Commands::History { action } => match action {
            HistoryAction::List => commands::history::run_history_list(&settings),
            HistoryAction::Last => commands::history::run_history_last(&settings),
            HistoryAction::Clear => commands::history::run_history_clear(&settings),
            HistoryAction::Top { count } => commands::history::run_history_top(&settings, count),
        },
        Commands::Catalog { action } => match action {
            CatalogAction::Init { demo } => commands::catalog::run_catalog_init(&settings, demo),
            CatalogAction::Stats => commands::catalog::run_catalog_stats(&settings),
        },
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => commands::config::run_config_show(&settings, &sources),
                ConfigAction::Path => commands::config::run_config_path(),
            }
            Ok(())
        }
    }
}

/// Create the directories behind default paths so first runs work without
/// any setup. Explicitly configured locations are left alone.
fn prepare_default_dirs(settings: &Settings, sources: &SettingSources) {
    let mut dirs: Vec<&Path> = Vec::new();
    if sources.accounts_path == SettingSource::Default {
        dirs.extend(settings.accounts_path.parent());
    }
    if sources.history_path == SettingSource::Default {
        dirs.extend(settings.history_path.parent());
    }
    if sources.last_query_dir == SettingSource::Default {
        dirs.push(&settings.last_query_dir);
    }
    for dir in dirs {
        if let Err(e) = std::fs::create_dir_all(dir) {
            log::warn!("Could not create {}: {}", dir.display(), e);
        }
    }
}
