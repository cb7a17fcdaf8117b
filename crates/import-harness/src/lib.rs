// crates/import-harness/src/lib.rs
// ============================================================================
// Module: Import Harness Library
// Description: Shared building blocks for import endpoint integration tests.
// Purpose: Resolve environments, drive the import API, verify persistence.
// Dependencies: reqwest, mysql, postgres, rusqlite, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This crate hosts the harness used by the import endpoint system tests:
//! - [`config`] resolves the target environment and env-var settings.
//! - [`client`] authenticates and issues `POST {base_url}/import` calls.
//! - [`db`] opens a scoped database connection and runs SQL fixture files.
//! - [`cases`] loads `(argument, expected_status)` pairs from JSON fixtures.
//! - [`fixtures`] wires the above into ready-to-use test fixtures.
//!
//! All network and database calls are blocking. Failures surface as typed
//! errors; nothing in this crate converts a failure into an absent value.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cases;
pub mod client;
pub mod config;
pub mod db;
pub mod fixtures;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// ============================================================================
// SECTION: Tests
// ============================================================================
