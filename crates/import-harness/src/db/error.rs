// crates/import-harness/src/db/error.rs
// ============================================================================
// Module: Database Errors
// Dependencies: thiserror
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by the database verification helper.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Connection settings could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Connection could not be opened or failed its liveness check.
    #[error("database connection failed: {0}")]
    Connect(String),
    /// Connection was already released.
    #[error("database connection is closed")]
    Closed,
    /// SQL file could not be read.
    #[error("failed to read sql file {path}: {message}")]
    SqlFile {
        /// SQL file path.
        path: PathBuf,
        /// I/O failure.
        message: String,
    },
    /// Bound parameters do not match the statement placeholders.
    #[error("statement expects {expected} parameters, got {actual}")]
    ParamCount {
        /// Placeholders in the statement.
        expected: usize,
        /// Parameters supplied.
        actual: usize,
    },
    /// Parameter cannot be bound to the placeholder's type.
    #[error("parameter ${position} cannot be bound as {ty}")]
    UnsupportedParam {
        /// 1-based placeholder position.
        position: usize,
        /// Database type name of the placeholder.
        ty: String,
    },
    /// Column type has no JSON mapping.
    #[error("column {column} has unsupported type {ty}")]
    UnsupportedColumn {
        /// Column name.
        column: String,
        /// Database type name.
        ty: String,
    },
    /// Statement preparation or execution failed.
    #[error("query failed: {0}")]
    Query(String),
}
