// crates/import-harness/src/db/sqlite_engine.rs
// ============================================================================
// Module: SQLite Engine
// Description: Open, check, and query a local SQLite database file.
// Dependencies: rusqlite, serde_json
// ============================================================================

//! ## Overview
//! The database file must already exist; the helper never creates one.
//! Placeholders are bound by `$n` name when the statement uses that form and
//! by position otherwise, so `$1` and `?` files both work.

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::types::Value as SqliteValue;
use rusqlite::types::ValueRef;
use serde_json::Value;

use super::DbError;
use super::SqlParam;
use super::VerificationRow;
use super::params::float_value;

/// Opens an existing database file and checks it is live.
pub(super) fn open(path: &Path) -> Result<Connection, DbError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX
        | OpenFlags::SQLITE_OPEN_URI;
    let connection = Connection::open_with_flags(path, flags)
        .map_err(|err| DbError::Connect(format!("{}: {err}", path.display())))?;
    connection
        .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .map_err(|err| DbError::Connect(format!("{}: {err}", path.display())))?;
    Ok(connection)
}

/// Runs one statement and collects every row.
pub(super) fn query(
    connection: &Connection,
    sql: &str,
    params: &[SqlParam],
) -> Result<Vec<VerificationRow>, DbError> {
    let mut stmt = connection.prepare(sql.trim_end()).map_err(query_error)?;
    let expected = stmt.parameter_count();
    if expected != params.len() {
        return Err(DbError::ParamCount {
            expected,
            actual: params.len(),
        });
    }
    for (offset, param) in params.iter().enumerate() {
        let position = offset + 1;
        let index =
            stmt.parameter_index(&format!("${position}")).map_err(query_error)?.unwrap_or(position);
        stmt.raw_bind_parameter(index, to_sqlite(param)).map_err(query_error)?;
    }

    let columns: Vec<String> = stmt.column_names().into_iter().map(str::to_string).collect();
    let mut rows = stmt.raw_query();
    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(query_error)? {
        let mut record = VerificationRow::new();
        for (index, column) in columns.iter().enumerate() {
            let value = row.get_ref(index).map_err(query_error)?;
            record.insert(column.clone(), to_json(value));
        }
        out.push(record);
    }
    Ok(out)
}

/// Converts a bound parameter to an owned `SQLite` value.
fn to_sqlite(param: &SqlParam) -> SqliteValue {
    match param {
        SqlParam::Null => SqliteValue::Null,
        SqlParam::Bool(value) => SqliteValue::Integer(i64::from(*value)),
        SqlParam::Int(value) => SqliteValue::Integer(*value),
        SqlParam::Float(value) => SqliteValue::Real(*value),
        SqlParam::Text(value) => SqliteValue::Text(value.clone()),
    }
}

/// Maps a column value to JSON.
fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::from(value),
        ValueRef::Real(value) => float_value(value),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|byte| Value::from(*byte)).collect()),
    }
}

/// Wraps an engine error.
fn query_error(err: rusqlite::Error) -> DbError {
    DbError::Query(err.to_string())
}
