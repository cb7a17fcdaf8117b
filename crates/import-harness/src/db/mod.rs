// crates/import-harness/src/db/mod.rs
// ============================================================================
// Module: Database Verification Helper
// Description: Scoped connections and parametrized SQL fixture execution.
// Purpose: Confirm that imported rows were persisted.
// Dependencies: mysql, postgres, rusqlite, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! SQL fixture files use `$1..$n` positional placeholders on every engine.
//! Identifier quoting differs between engines, so fixtures that quote
//! identifiers ship one file per engine. Results come back as one
//! column-name keyed map per row. There are no transactions, retries, or
//! statement caches.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;
mod connection;
mod error;
mod mysql_engine;
mod params;
mod postgres_engine;
mod sqlite_engine;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::DEFAULT_MYSQL_PORT;
pub use config::DEFAULT_POSTGRES_PORT;
pub use config::DatabaseConfig;
pub use config::DbEngine;
pub use config::ServerConfig;
pub use connection::DbConnection;
pub use error::DbError;
pub use params::SqlParam;
pub use params::VerificationRow;
