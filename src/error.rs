use thiserror::Error;

use crate::sql::types::ColumnType;

/// Custom Result type for minisql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for minisql
///
/// Every statement failure is reported through one of these variants, so a
/// failing statement never aborts the batch it belongs to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// SQL parsing error (malformed statement text)
    #[error("parse error {0}")]
    Parse(String),
    #[error("table {0} does not exist")]
    TableNotFound(String),
    #[error("table {0} already exists")]
    TableExists(String),
    #[error("column {0} does not exist")]
    ColumnNotFound(String),
    #[error("column {0} is defined more than once")]
    DuplicateColumn(String),
    /// Number of literals differs from the number of columns
    #[error("value count ({found}) does not match column count ({expected})")]
    ColumnCountMismatch { expected: usize, found: usize },
    /// Literal at a 1-based position is not acceptable for the column type
    #[error("value {literal} at position {position} is not a valid {expected}")]
    TypeMismatch {
        position: usize,
        literal: String,
        expected: ColumnType,
    },
    #[error("unsupported statement: {0}")]
    UnknownStatement(String),
    #[error("missing {0} clause")]
    MissingClause(String),
    /// Invalid configuration document
    #[error("config error {0}")]
    Config(String),
    #[error("internal error {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Config(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use crate::sql::types::ColumnType;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::TableNotFound("users".to_string()).to_string(),
            "table users does not exist"
        );
        assert_eq!(
            Error::TypeMismatch {
                position: 2,
                literal: "abc".to_string(),
                expected: ColumnType::Integer,
            }
            .to_string(),
            "value abc at position 2 is not a valid INTEGER"
        );
        assert_eq!(
            Error::ColumnCountMismatch { expected: 3, found: 2 }.to_string(),
            "value count (2) does not match column count (3)"
        );
    }
}
