//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "film-finder")]
#[command(about = "Search a film catalog and keep a history of your queries", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database (overrides FILM_FINDER_CATALOG and settings.toml)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// History database (overrides FILM_FINDER_HISTORY and settings.toml)
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start an interactive session (the default)
    Run {
        /// Skip the welcome and log-in screens
        #[arg(long)]
        skip_login: bool,
    },

    /// Inspect or clear the query history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Create or inspect the film catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// Show resolved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum HistoryAction {
    /// List logged queries, oldest first
    List,

    /// Print the last logged query
    Last,

    /// Delete all history and the last query
    Clear,

    /// Show the most frequent search values
    Top {
        /// Number of values to show
        #[arg(default_value_t = 5)]
        count: usize,
    },
}

#[derive(Subcommand)]
pub(crate) enum CatalogAction {
    /// Create the catalog schema
    Init {
        /// Also load a small demo data set
        #[arg(long)]
        demo: bool,
    },

    /// Show film, actor and genre counts
    Stats,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the settings file path
    Path,
}
