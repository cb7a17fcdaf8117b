// crates/import-harness/src/cases.rs
// ============================================================================
// Module: Case Loader
// Description: JSON fixture loader for parametrized scenarios.
// Purpose: Turn a JSON array of objects into (argument, expected status) pairs.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A case file is a JSON array of objects. Each object carries the scenario
//! argument and the expected HTTP status under configurable field names
//! (`argumento` and `expected_status` by default). Order is preserved.
//! Every defect in the file is reported with the offending index; nothing is
//! skipped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default field holding the scenario argument.
pub const DEFAULT_ARGUMENT_FIELD: &str = "argumento";
/// Default field holding the expected HTTP status.
pub const DEFAULT_STATUS_FIELD: &str = "expected_status";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Errors raised while loading a case file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaseError {
    /// File could not be read.
    #[error("failed to read case file {path}: {message}")]
    Io {
        /// Case file path.
        path: PathBuf,
        /// I/O failure.
        message: String,
    },
    /// File is not valid JSON.
    #[error("case file {path} is not valid json: {message}")]
    Json {
        /// Case file path.
        path: PathBuf,
        /// Parse failure.
        message: String,
    },
    /// Root value is not an array of objects.
    #[error("case file {path} must contain a json array of objects")]
    Shape {
        /// Case file path.
        path: PathBuf,
    },
    /// Case object lacks a configured field.
    #[error("case {index} in {path} is missing field {field}")]
    MissingField {
        /// Case file path.
        path: PathBuf,
        /// 0-based case index.
        index: usize,
        /// Missing field name.
        field: String,
    },
    /// Argument does not decode into the requested type.
    #[error("case {index} in {path} has an invalid argument: {message}")]
    InvalidArgument {
        /// Case file path.
        path: PathBuf,
        /// 0-based case index.
        index: usize,
        /// Decode failure.
        message: String,
    },
    /// Expected status is not an HTTP status code.
    #[error("case {index} in {path} has an invalid expected status: {value}")]
    InvalidStatus {
        /// Case file path.
        path: PathBuf,
        /// 0-based case index.
        index: usize,
        /// Offending value.
        value: String,
    },
}

/// Field names read from each case object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFields {
    /// Argument field name.
    pub argument: String,
    /// Expected status field name.
    pub status: String,
}

impl CaseFields {
    /// Uses a custom argument field with the default status field.
    #[must_use]
    pub fn with_argument(argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            ..Self::default()
        }
    }
}

impl Default for CaseFields {
    fn default() -> Self {
        Self {
            argument: DEFAULT_ARGUMENT_FIELD.to_string(),
            status: DEFAULT_STATUS_FIELD.to_string(),
        }
    }
}

/// One parametrized scenario input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase<A> {
    /// Scenario argument.
    pub argument: A,
    /// Expected HTTP status.
    pub expected_status: u16,
}

impl<A> From<TestCase<A>> for (A, u16) {
    fn from(case: TestCase<A>) -> Self {
        (case.argument, case.expected_status)
    }
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads every case from a JSON file, preserving order.
///
/// # Errors
///
/// Returns an error when the file is missing or malformed, or any case lacks
/// a field or carries an invalid value.
pub fn load_cases<A: DeserializeOwned>(
    path: impl AsRef<Path>,
    fields: &CaseFields,
) -> Result<Vec<TestCase<A>>, CaseError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| CaseError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let root: Value = serde_json::from_str(&text).map_err(|err| CaseError::Json {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let Value::Array(items) = root else {
        return Err(CaseError::Shape {
            path: path.to_path_buf(),
        });
    };
    items.into_iter().enumerate().map(|(index, item)| parse_case(path, index, item, fields)).collect()
}

/// Extracts one case object.
fn parse_case<A: DeserializeOwned>(
    path: &Path,
    index: usize,
    item: Value,
    fields: &CaseFields,
) -> Result<TestCase<A>, CaseError> {
    let Value::Object(mut object) = item else {
        return Err(CaseError::Shape {
            path: path.to_path_buf(),
        });
    };
    let missing = |field: &str| CaseError::MissingField {
        path: path.to_path_buf(),
        index,
        field: field.to_string(),
    };
    let argument = object.remove(&fields.argument).ok_or_else(|| missing(&fields.argument))?;
    let status = object.remove(&fields.status).ok_or_else(|| missing(&fields.status))?;

    let argument = serde_json::from_value(argument).map_err(|err| CaseError::InvalidArgument {
        path: path.to_path_buf(),
        index,
        message: err.to_string(),
    })?;
    let expected_status = status
        .as_u64()
        .and_then(|code| u16::try_from(code).ok())
        .filter(|code| (100..=599).contains(code))
        .ok_or_else(|| CaseError::InvalidStatus {
            path: path.to_path_buf(),
            index,
            value: status.to_string(),
        })?;
    Ok(TestCase {
        argument,
        expected_status,
    })
}
