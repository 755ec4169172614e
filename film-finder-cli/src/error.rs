use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The account store could not be reached. Ends the session.
    #[error("Account store error: {0}")]
    AccountStore(String),

    /// Catalog database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// History backend unavailable or failed
    #[error("History error: {0}")]
    History(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid command-line value
    #[error("{0}")]
    InvalidArgument(String),
}

impl CliError {
    pub(crate) fn account_store(msg: impl Into<String>) -> Self {
        Self::AccountStore(msg.into())
    }

    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn history(msg: impl Into<String>) -> Self {
        Self::History(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Process exit status for this error.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}
