// crates/import-harness/src/db/mysql_engine.rs
// ============================================================================
// Module: MySQL Engine
// Description: Open, check, and query a MySQL server.
// Dependencies: mysql, serde_json
// ============================================================================

//! ## Overview
//! MySQL prepared statements only understand `?`. Statement text may use
//! `$1..$n`, `?`, or `%s`; numbered placeholders are rewritten to `?` and the
//! bound values reordered to match, so one `$n` fixture binds the same way on
//! every engine. Quoted strings and comments are copied untouched.

use std::iter::Peekable;
use std::str::Chars;

use mysql::Conn;
use mysql::Opts;
use mysql::OptsBuilder;
use mysql::Params;
use mysql::Row;
use mysql::Value as MysqlValue;
use mysql::consts::ColumnType;
use mysql::prelude::Queryable;
use serde_json::Value;

use super::DbError;
use super::ServerConfig;
use super::SqlParam;
use super::VerificationRow;
use super::params::float_value;

/// Character cursor over statement text.
type Cursor<'a> = Peekable<Chars<'a>>;

/// Statement text using only `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Rewritten {
    /// Rewritten statement.
    pub(super) sql: String,
    /// 1-based parameter number bound to each `?`, in statement order.
    pub(super) order: Vec<usize>,
}

impl Rewritten {
    /// Number of parameters the caller must supply.
    pub(super) fn expected_params(&self) -> usize {
        self.order.iter().copied().max().unwrap_or(0)
    }
}

/// Connects and checks the server is live.
pub(super) fn open(config: &ServerConfig) -> Result<Conn, DbError> {
    let opts = OptsBuilder::new()
        .ip_or_hostname(Some(config.host.as_str()))
        .tcp_port(config.port)
        .user(Some(config.user.as_str()))
        .pass(Some(config.password.as_str()))
        .db_name(Some(config.dbname.as_str()));
    let connect_error =
        |err: mysql::Error| DbError::Connect(format!("{}:{}: {err}", config.host, config.port));
    let mut conn = Conn::new(Opts::from(opts)).map_err(connect_error)?;
    conn.query_drop("SELECT 1").map_err(connect_error)?;
    Ok(conn)
}

/// Runs one statement and collects every row.
pub(super) fn query(
    conn: &mut Conn,
    sql: &str,
    params: &[SqlParam],
) -> Result<Vec<VerificationRow>, DbError> {
    let rewritten = rewrite_placeholders(sql)?;
    let values = bind_in_order(&rewritten, params)?;
    let stmt = conn.prep(rewritten.sql.trim_end().trim_end_matches(';')).map_err(query_error)?;
    let bound = if values.is_empty() { Params::Empty } else { Params::Positional(values) };
    let rows: Vec<Row> = conn.exec(&stmt, bound).map_err(query_error)?;
    rows.iter().map(to_record).collect()
}

/// Rewrites `$n` and `%s` placeholders to `?`.
///
/// # Errors
///
/// Returns [`DbError::Query`] for `$0` or when numbered placeholders are
/// mixed with `?` or `%s`.
pub(super) fn rewrite_placeholders(sql: &str) -> Result<Rewritten, DbError> {
    let mut out = String::with_capacity(sql.len());
    let mut order = Vec::new();
    let mut numbered = false;
    let mut positional = 0usize;
    let mut prev = ' ';
    let mut chars = sql.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\'' | '"' | '`' => {
                out.push(ch);
                copy_quoted(&mut chars, &mut out, ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(ch);
                copy_line_comment(&mut chars, &mut out);
            }
            '#' => {
                out.push(ch);
                copy_line_comment(&mut chars, &mut out);
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(ch);
                chars.next();
                out.push('*');
                copy_block_comment(&mut chars, &mut out);
            }
            '$' if !is_identifier_char(prev) && chars.peek().is_some_and(char::is_ascii_digit) => {
                let mut digits = String::new();
                while let Some(digit) = chars.next_if(char::is_ascii_digit) {
                    digits.push(digit);
                }
                let number = digits
                    .parse::<usize>()
                    .ok()
                    .filter(|number| *number > 0)
                    .ok_or_else(|| DbError::Query(format!("invalid placeholder ${digits}")))?;
                numbered = true;
                order.push(number);
                out.push('?');
            }
            '?' => {
                positional += 1;
                order.push(positional);
                out.push('?');
            }
            '%' if chars.peek() == Some(&'s') => {
                chars.next();
                positional += 1;
                order.push(positional);
                out.push('?');
            }
            _ => out.push(ch),
        }
        prev = ch;
    }
    if numbered && positional > 0 {
        return Err(DbError::Query("cannot mix $n placeholders with ? or %s".to_string()));
    }
    Ok(Rewritten {
        sql: out,
        order,
    })
}

/// Orders parameter values to match the rewritten placeholders.
pub(super) fn bind_in_order(
    rewritten: &Rewritten,
    params: &[SqlParam],
) -> Result<Vec<MysqlValue>, DbError> {
    let count_error = || DbError::ParamCount {
        expected: rewritten.expected_params(),
        actual: params.len(),
    };
    if rewritten.expected_params() != params.len() {
        return Err(count_error());
    }
    rewritten
        .order
        .iter()
        .map(|number| {
            number
                .checked_sub(1)
                .and_then(|index| params.get(index))
                .map(to_mysql)
                .ok_or_else(count_error)
        })
        .collect()
}

/// Returns true for characters that continue an identifier.
const fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Copies a quoted literal or identifier through its closing quote.
fn copy_quoted(chars: &mut Cursor<'_>, out: &mut String, quote: char) {
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == '\\' && quote != '`' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if ch == quote {
            return;
        }
    }
}

/// Copies a comment through the end of its line.
fn copy_line_comment(chars: &mut Cursor<'_>, out: &mut String) {
    for ch in chars.by_ref() {
        out.push(ch);
        if ch == '\n' {
            return;
        }
    }
}

/// Copies a block comment body through `*/`.
fn copy_block_comment(chars: &mut Cursor<'_>, out: &mut String) {
    let mut prev = ' ';
    for ch in chars.by_ref() {
        out.push(ch);
        if prev == '*' && ch == '/' {
            return;
        }
        prev = ch;
    }
}

/// Converts a bound parameter to a driver value.
pub(super) fn to_mysql(param: &SqlParam) -> MysqlValue {
    match param {
        SqlParam::Null => MysqlValue::NULL,
        SqlParam::Bool(value) => MysqlValue::Int(i64::from(*value)),
        SqlParam::Int(value) => MysqlValue::Int(*value),
        SqlParam::Float(value) => MysqlValue::Double(*value),
        SqlParam::Text(value) => MysqlValue::Bytes(value.as_bytes().to_vec()),
    }
}

/// Maps one result row to a column-name keyed record.
fn to_record(row: &Row) -> Result<VerificationRow, DbError> {
    let mut record = VerificationRow::new();
    for (index, column) in row.columns_ref().iter().enumerate() {
        let name = column.name_str().into_owned();
        let value = match row.as_ref(index) {
            Some(value) => to_json(value, column.column_type())
                .ok_or_else(|| DbError::Query(format!("column {name} holds invalid json")))?,
            None => Value::Null,
        };
        record.insert(name, value);
    }
    Ok(record)
}

/// Maps a column value to JSON; `None` only for malformed `JSON` columns.
pub(super) fn to_json(value: &MysqlValue, column_type: ColumnType) -> Option<Value> {
    let json = match value {
        MysqlValue::NULL => Value::Null,
        MysqlValue::Int(value) => Value::from(*value),
        MysqlValue::UInt(value) => Value::from(*value),
        MysqlValue::Float(value) => float_value(f64::from(*value)),
        MysqlValue::Double(value) => float_value(*value),
        MysqlValue::Bytes(bytes) if column_type == ColumnType::MYSQL_TYPE_JSON => {
            serde_json::from_slice(bytes).ok()?
        }
        MysqlValue::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Value::from(text),
            Err(_) => Value::Array(bytes.iter().map(|byte| Value::from(*byte)).collect()),
        },
        MysqlValue::Date(year, month, day, hour, minute, second, micros) => {
            let date = format!("{year:04}-{month:02}-{day:02}");
            if column_type == ColumnType::MYSQL_TYPE_DATE {
                Value::String(date)
            } else {
                Value::String(format!(
                    "{date} {}",
                    clock(u32::from(*hour), *minute, *second, *micros)
                ))
            }
        }
        MysqlValue::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if *negative { "-" } else { "" };
            let hours = days.saturating_mul(24).saturating_add(u32::from(*hours));
            Value::String(format!("{sign}{}", clock(hours, *minutes, *seconds, *micros)))
        }
    };
    Some(json)
}

/// Formats `hh:mm:ss` with a microsecond suffix when non-zero.
fn clock(hours: u32, minutes: u8, seconds: u8, micros: u32) -> String {
    if micros == 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{micros:06}")
    }
}

/// Wraps a driver error.
fn query_error(err: mysql::Error) -> DbError {
    DbError::Query(err.to_string())
}
