// crates/import-harness/src/db/postgres_engine.rs
// ============================================================================
// Module: Postgres Engine
// Description: Open, check, and query a Postgres server.
// Dependencies: postgres, serde_json
// ============================================================================

//! ## Overview
//! Postgres binds parameters with strict types, so each [`SqlParam`] is
//! converted to the Rust type matching the placeholder type the server
//! inferred at prepare time. Result columns map to JSON by column type;
//! columns without a mapping fail the query instead of being dropped.
//!
//! Coercions:
//! - `NULL` binds to every supported type.
//! - Every value binds to its own type, to `text`, and to `json`/`jsonb`.
//!   Text bound to `json` must parse as JSON.
//! - Integers bind to `int2`/`int4` when in range and widen to `int8`,
//!   `float4`, and `float8`.
//! - Floats bind to `float4`/`float8`; non-finite floats have no JSON form.
//! - Nothing narrows from float to integer or parses text into a number.

use postgres::Client;
use postgres::NoTls;
use postgres::Row;
use postgres::types::ToSql;
use postgres::types::Type;
use serde_json::Value;

use super::DbError;
use super::ServerConfig;
use super::SqlParam;
use super::VerificationRow;
use super::params::float_value;

/// Boxed parameter accepted by the driver.
pub(super) type BoxedParam = Box<dyn ToSql + Sync>;

/// Column and placeholder types the helper knows how to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum PgKind {
    /// `bool`.
    Bool,
    /// `int2`.
    Int2,
    /// `int4`.
    Int4,
    /// `int8`.
    Int8,
    /// `float4`.
    Float4,
    /// `float8`.
    Float8,
    /// `text`, `varchar`, `bpchar`, `name`.
    Text,
    /// `json`, `jsonb`.
    Json,
}

/// Classifies a driver type.
pub(super) fn classify(ty: &Type) -> Option<PgKind> {
    if *ty == Type::BOOL {
        Some(PgKind::Bool)
    } else if *ty == Type::INT2 {
        Some(PgKind::Int2)
    } else if *ty == Type::INT4 {
        Some(PgKind::Int4)
    } else if *ty == Type::INT8 {
        Some(PgKind::Int8)
    } else if *ty == Type::FLOAT4 {
        Some(PgKind::Float4)
    } else if *ty == Type::FLOAT8 {
        Some(PgKind::Float8)
    } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME].contains(ty) {
        Some(PgKind::Text)
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        Some(PgKind::Json)
    } else {
        None
    }
}

/// Connects and checks the server is live.
pub(super) fn open(config: &ServerConfig) -> Result<Client, DbError> {
    let mut client = postgres::Config::new()
        .host(&config.host)
        .port(config.port)
        .user(&config.user)
        .password(&config.password)
        .dbname(&config.dbname)
        .connect(NoTls)
        .map_err(|err| DbError::Connect(format!("{}:{}: {err}", config.host, config.port)))?;
    client
        .simple_query("SELECT 1")
        .map_err(|err| DbError::Connect(format!("{}:{}: {err}", config.host, config.port)))?;
    Ok(client)
}

/// Runs one statement and collects every row.
pub(super) fn query(
    client: &mut Client,
    sql: &str,
    params: &[SqlParam],
) -> Result<Vec<VerificationRow>, DbError> {
    let stmt = client.prepare(sql).map_err(query_error)?;
    let expected = stmt.params().len();
    if expected != params.len() {
        return Err(DbError::ParamCount {
            expected,
            actual: params.len(),
        });
    }
    let bound = params
        .iter()
        .zip(stmt.params())
        .enumerate()
        .map(|(offset, (param, ty))| bind(offset + 1, param, ty))
        .collect::<Result<Vec<BoxedParam>, DbError>>()?;
    let refs: Vec<&(dyn ToSql + Sync)> = bound.iter().map(|param| param.as_ref()).collect();
    let rows = client.query(&stmt, &refs).map_err(query_error)?;
    rows.iter().map(to_record).collect()
}

/// Converts a parameter to the Rust type the placeholder accepts.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "float placeholders accept the nearest representable value."
)]
pub(super) fn bind(position: usize, param: &SqlParam, ty: &Type) -> Result<BoxedParam, DbError> {
    let unsupported = || DbError::UnsupportedParam {
        position,
        ty: ty.name().to_string(),
    };
    let kind = classify(ty).ok_or_else(unsupported)?;
    let bound: BoxedParam = match (param, kind) {
        (SqlParam::Null, PgKind::Bool) => Box::new(None::<bool>),
        (SqlParam::Null, PgKind::Int2) => Box::new(None::<i16>),
        (SqlParam::Null, PgKind::Int4) => Box::new(None::<i32>),
        (SqlParam::Null, PgKind::Int8) => Box::new(None::<i64>),
        (SqlParam::Null, PgKind::Float4) => Box::new(None::<f32>),
        (SqlParam::Null, PgKind::Float8) => Box::new(None::<f64>),
        (SqlParam::Null, PgKind::Text) => Box::new(None::<String>),
        (SqlParam::Null, PgKind::Json) => Box::new(None::<Value>),
        (SqlParam::Bool(value), PgKind::Bool) => Box::new(*value),
        (SqlParam::Bool(value), PgKind::Text) => Box::new(value.to_string()),
        (SqlParam::Bool(value), PgKind::Json) => Box::new(Value::Bool(*value)),
        (SqlParam::Int(value), PgKind::Int2) => {
            Box::new(i16::try_from(*value).map_err(|_| unsupported())?)
        }
        (SqlParam::Int(value), PgKind::Int4) => {
            Box::new(i32::try_from(*value).map_err(|_| unsupported())?)
        }
        (SqlParam::Int(value), PgKind::Int8) => Box::new(*value),
        (SqlParam::Int(value), PgKind::Float4) => Box::new(*value as f32),
        (SqlParam::Int(value), PgKind::Float8) => Box::new(*value as f64),
        (SqlParam::Int(value), PgKind::Text) => Box::new(value.to_string()),
        (SqlParam::Int(value), PgKind::Json) => Box::new(Value::from(*value)),
        (SqlParam::Float(value), PgKind::Float4) => Box::new(*value as f32),
        (SqlParam::Float(value), PgKind::Float8) => Box::new(*value),
        (SqlParam::Float(value), PgKind::Text) => Box::new(value.to_string()),
        (SqlParam::Float(value), PgKind::Json) => Box::new(Value::Number(
            serde_json::Number::from_f64(*value).ok_or_else(unsupported)?,
        )),
        (SqlParam::Text(value), PgKind::Text) => Box::new(value.clone()),
        (SqlParam::Text(value), PgKind::Json) => {
            Box::new(serde_json::from_str::<Value>(value).map_err(|_| unsupported())?)
        }
        _ => return Err(unsupported()),
    };
    Ok(bound)
}

/// Maps one result row to a column-name keyed record.
fn to_record(row: &Row) -> Result<VerificationRow, DbError> {
    let mut record = VerificationRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        let ty = column.type_();
        let kind = classify(ty).ok_or_else(|| DbError::UnsupportedColumn {
            column: column.name().to_string(),
            ty: ty.name().to_string(),
        })?;
        let value = match kind {
            PgKind::Bool => row.try_get::<_, Option<bool>>(index).map(|v| v.map(Value::from)),
            PgKind::Int2 => row.try_get::<_, Option<i16>>(index).map(|v| v.map(Value::from)),
            PgKind::Int4 => row.try_get::<_, Option<i32>>(index).map(|v| v.map(Value::from)),
            PgKind::Int8 => row.try_get::<_, Option<i64>>(index).map(|v| v.map(Value::from)),
            PgKind::Float4 => row
                .try_get::<_, Option<f32>>(index)
                .map(|v| v.map(|f| float_value(f64::from(f)))),
            PgKind::Float8 => row.try_get::<_, Option<f64>>(index).map(|v| v.map(float_value)),
            PgKind::Text => row.try_get::<_, Option<String>>(index).map(|v| v.map(Value::from)),
            PgKind::Json => row.try_get::<_, Option<Value>>(index),
        }
        .map_err(query_error)?;
        record.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }
    Ok(record)
}

/// Wraps a driver error.
fn query_error(err: postgres::Error) -> DbError {
    DbError::Query(err.to_string())
}
