use thiserror::Error;

/// Template/parameter mismatch found while rendering or binding a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A placeholder in the template has no value in the parameter map
    #[error("SQL formatting error: missing value for placeholder '{0}'")]
    MissingParameter(String),

    /// A parameter was supplied that the template never references
    #[error("SQL formatting error: parameter '{0}' is not used by the query")]
    UnusedParameter(String),

    /// A `%` sequence that is neither `%(name)s` nor `%%`
    #[error("SQL formatting error: malformed placeholder at byte {offset}: {detail}")]
    Malformed { offset: usize, detail: String },
}

/// A search request rejected before any query is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("The search text cannot be empty")]
    EmptyInput,

    #[error("The actor name should not be a number: {0}")]
    NumericName(String),

    #[error("Second year must be greater than the first ({from} >= {to})")]
    InvalidRange { from: i64, to: i64 },
}
