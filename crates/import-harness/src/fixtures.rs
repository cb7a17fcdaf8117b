// crates/import-harness/src/fixtures.rs
// ============================================================================
// Module: Scenario Fixtures
// Description: Ready-made client, token, and connection for scenarios.
// Dependencies: crate::client, crate::config, crate::db
// ============================================================================

//! ## Overview
//! Each fixture builds a fresh value per call; nothing is shared across
//! tests. The target environment comes from `IMPORT_HARNESS_ENV` (default
//! `test`) and every other setting from env vars or `.env`.

use std::path::Path;
use std::path::PathBuf;

use crate::client::AuthToken;
use crate::client::ImportClient;
use crate::client::ImportError;
use crate::config::Environment;
use crate::config::load_dotenv;
use crate::db::DatabaseConfig;
use crate::db::DbConnection;
use crate::db::DbEngine;
use crate::db::DbError;

/// SQL file selecting an imported person by `personId` (`$1`).
///
/// Postgres and `SQLite` read the case-sensitive `"personId"` column through
/// double quotes, which MySQL treats as a string literal, so each engine has
/// its own copy under `fixtures/sql/<engine>/`.
#[must_use]
pub fn select_person_id_sql(engine: DbEngine) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("sql")
        .join(engine.as_str())
        .join("select_person_id.sql")
}

/// Authenticated client for the configured environment.
///
/// # Errors
///
/// Returns an error when the environment or credentials are misconfigured.
pub fn api_client() -> Result<ImportClient, ImportError> {
    load_dotenv();
    ImportClient::from_env(Environment::from_env()?)
}

/// Fresh bearer token for the configured environment.
///
/// # Errors
///
/// Returns an error when the client cannot be built or the fetch fails.
pub fn auth_token() -> Result<AuthToken, ImportError> {
    Ok(api_client()?.fetch_token()?)
}

/// Managed database connection, released when dropped.
///
/// # Errors
///
/// Returns an error when settings are invalid or the connection fails.
pub fn db_connection() -> Result<DbConnection, DbError> {
    DbConnection::from_env()
}

/// Runs `body` with a connection and releases it on every exit path.
///
/// # Errors
///
/// Returns the connection error or whatever `body` returns.
pub fn with_db_connection<T, E>(
    body: impl FnOnce(&mut DbConnection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DbError>,
{
    let mut connection = db_connection()?;
    let outcome = body(&mut connection);
    connection.close();
    outcome
}

/// Like [`with_db_connection`] but against explicit settings.
///
/// # Errors
///
/// Returns the connection error or whatever `body` returns.
pub fn with_db_connection_to<T, E>(
    config: &DatabaseConfig,
    body: impl FnOnce(&mut DbConnection) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DbError>,
{
    let mut connection = DbConnection::open(config)?;
    let outcome = body(&mut connection);
    connection.close();
    outcome
}
