// crates/import-harness/src/db/connection.rs
// ============================================================================
// Module: Scoped Database Connection
// Description: Live connection handle with idempotent release.
// Purpose: Run SQL fixture files and return rows as column maps.
// Dependencies: mysql, postgres, rusqlite, tracing
// ============================================================================

//! ## Overview
//! [`DbConnection::open`] returns a handle only after a liveness check
//! succeeds. The handle is released by [`DbConnection::close`] or on drop,
//! whichever comes first, so every exit path of a test releases it.

use std::fmt;
use std::fs;
use std::path::Path;

use super::DatabaseConfig;
use super::DbEngine;
use super::DbError;
use super::SqlParam;
use super::VerificationRow;
use super::mysql_engine;
use super::postgres_engine;
use super::sqlite_engine;
use crate::config::load_dotenv;

/// Open engine handle.
enum Backend {
    /// MySQL connection.
    Mysql(mysql::Conn),
    /// Postgres client.
    Postgres(Box<postgres::Client>),
    /// `SQLite` connection.
    Sqlite(rusqlite::Connection),
}

/// Scoped database connection.
pub struct DbConnection {
    /// Open handle; `None` once released.
    backend: Option<Backend>,
}

impl DbConnection {
    /// Opens a connection and checks it with `SELECT 1`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connect`] when the connection fails or the check
    /// fails.
    pub fn open(config: &DatabaseConfig) -> Result<Self, DbError> {
        let backend = match config {
            DatabaseConfig::Mysql(settings) => mysql_engine::open(settings).map(Backend::Mysql),
            DatabaseConfig::Postgres(settings) => {
                postgres_engine::open(settings).map(|client| Backend::Postgres(Box::new(client)))
            }
            DatabaseConfig::Sqlite {
                path,
            } => sqlite_engine::open(path).map(Backend::Sqlite),
        }
        .inspect_err(|err| tracing::warn!(error = %err, "database connection failed"))?;
        tracing::debug!(engine = config.engine().as_str(), "database connection opened");
        Ok(Self {
            backend: Some(backend),
        })
    }

    /// Opens a connection using env-var settings.
    ///
    /// # Errors
    ///
    /// Returns an error when settings are invalid or the connection fails.
    pub fn from_env() -> Result<Self, DbError> {
        load_dotenv();
        Self::open(&DatabaseConfig::from_env()?)
    }

    /// Returns true until the connection is released.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// Returns the engine of an open connection.
    #[must_use]
    pub const fn engine(&self) -> Option<DbEngine> {
        match &self.backend {
            Some(Backend::Mysql(_)) => Some(DbEngine::Mysql),
            Some(Backend::Postgres(_)) => Some(DbEngine::Postgres),
            Some(Backend::Sqlite(_)) => Some(DbEngine::Sqlite),
            None => None,
        }
    }

    /// Releases the connection. Calling it again is a no-op.
    pub fn close(&mut self) {
        let Some(backend) = self.backend.take() else {
            return;
        };
        let outcome = match backend {
            Backend::Mysql(conn) => {
                drop(conn);
                Ok(())
            }
            Backend::Postgres(client) => (*client).close().map_err(|err| err.to_string()),
            Backend::Sqlite(connection) => connection.close().map_err(|(_, err)| err.to_string()),
        };
        match outcome {
            Ok(()) => tracing::debug!("database connection closed"),
            Err(err) => tracing::warn!(error = %err, "database connection closed uncleanly"),
        }
    }

    /// Executes SQL text with positional parameters and returns every row.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection is closed, parameters do not
    /// match the placeholders, or the statement fails.
    pub fn execute_sql(
        &mut self,
        sql: &str,
        params: &[SqlParam],
    ) -> Result<Vec<VerificationRow>, DbError> {
        tracing::debug!(params = params.len(), "executing sql");
        match self.backend.as_mut().ok_or(DbError::Closed)? {
            Backend::Mysql(conn) => mysql_engine::query(conn, sql, params),
            Backend::Postgres(client) => postgres_engine::query(client, sql, params),
            Backend::Sqlite(connection) => sqlite_engine::query(connection, sql, params),
        }
    }

    /// Reads SQL from a file and executes it like [`Self::execute_sql`].
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or execution fails.
    pub fn execute_sql_file(
        &mut self,
        path: impl AsRef<Path>,
        params: &[SqlParam],
    ) -> Result<Vec<VerificationRow>, DbError> {
        let path = path.as_ref();
        let sql = fs::read_to_string(path).map_err(|err| DbError::SqlFile {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        self.execute_sql(&sql, params)
    }
}

impl fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConnection").field("engine", &self.engine()).finish()
    }
}

impl Drop for DbConnection {
    fn drop(&mut self) {
        self.close();
    }
}
