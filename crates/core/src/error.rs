use std::{error::Error as StdError, fmt, io, path::PathBuf};

use thiserror::Error;

pub type BoxedError = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: Option<usize>,
}

impl SourceLocation {
    #[must_use]
    pub fn line(line: usize) -> Self {
        Self { line, column: None }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "line {}:{column}", self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Execute(#[from] ExecutionError),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("input dump `{}` does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("failed to open input dump `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read input dump near line {line}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(
        "destination `{}` is locked by another process; close any other handle on it and run again",
        path.display()
    )]
    Locked { path: PathBuf },
    #[error("failed to remove previous destination `{}`", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open destination `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: BoxedError,
    },
}

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(
        "statement[{statement_index}] ({}) failed: {source}",
        render_location(source_location.as_ref())
    )]
    StatementFailed {
        statement_index: usize,
        sql: String,
        source_location: Option<SourceLocation>,
        #[source]
        source: BoxedError,
    },
    #[error("store query `{sql}` failed: {source}")]
    QueryFailed {
        sql: String,
        #[source]
        source: BoxedError,
    },
    #[error("`{sql}` found no open transaction: {}", TRANSACTION_ABORTED_MESSAGE)]
    TransactionAborted { sql: String },
}

const TRANSACTION_ABORTED_MESSAGE: &str =
    "the store rolled the import back, so every statement applied before the failure is lost";

impl ExecutionError {
    pub fn query_failed<E>(sql: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::QueryFailed {
            sql: sql.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        match self {
            Self::StatementFailed { sql, .. }
            | Self::QueryFailed { sql, .. }
            | Self::TransactionAborted { sql } => sql,
        }
    }

    /// The store's own message, without the statement context.
    #[must_use]
    pub fn store_message(&self) -> String {
        match self {
            Self::StatementFailed { source, .. } | Self::QueryFailed { source, .. } => {
                source.to_string()
            }
            Self::TransactionAborted { .. } => TRANSACTION_ABORTED_MESSAGE.to_string(),
        }
    }
}

fn render_location(location: Option<&SourceLocation>) -> String {
    location.map_or_else(|| "location=unknown".to_string(), ToString::to_string)
}
