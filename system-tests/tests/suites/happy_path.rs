// system-tests/tests/suites/happy_path.rs
// ============================================================================
// Module: Import Happy Path
// Description: Live import of a known person with persistence check.
// Purpose: Confirm the endpoint accepts a valid id and stores the row.
// Dependencies: system-tests helpers, import-harness
// ============================================================================

//! Happy-path import scenario for the live environment.

use import_harness::db::DbError;
use import_harness::db::SqlParam;
use import_harness::db::VerificationRow;
use import_harness::fixtures::api_client;
use import_harness::fixtures::select_person_id_sql;
use import_harness::fixtures::with_db_connection;
use serde_json::Value;
use system_tests::artifacts::TestReporter;
use system_tests::config::SystemTestConfig;

use crate::helpers;

/// Person id known to exist upstream.
const HAPPY_PERSON_ID: i64 = 111;

#[test]
fn import_known_person_persists_row() -> Result<(), Box<dyn std::error::Error>> {
    helpers::init_logging();
    let config = SystemTestConfig::load()?;
    let mut reporter = TestReporter::new(&config, "import_known_person_persists_row")?;

    if let Err(err) = import_and_verify(&reporter) {
        return Err(reporter.fail(
            err.to_string(),
            vec!["import_transcript.json".to_string(), "verification_rows.json".to_string()],
        ));
    }

    reporter.finish(
        "pass",
        vec![format!("personId {HAPPY_PERSON_ID} imported and persisted")],
        vec![
            "summary.json".to_string(),
            "summary.md".to_string(),
            "import_transcript.json".to_string(),
            "verification_rows.json".to_string(),
        ],
    )?;
    drop(reporter);
    Ok(())
}

/// Imports the known person and checks exactly one matching row landed.
fn import_and_verify(reporter: &TestReporter) -> Result<(), Box<dyn std::error::Error>> {
    let client = api_client()?;
    let response = client.post_import(HAPPY_PERSON_ID)?;
    reporter.artifacts().write_json("import_transcript.json", &client.transcript())?;
    if response.status() != 200 {
        return Err(format!(
            "import of personId {HAPPY_PERSON_ID} returned {}: {}",
            response.status(),
            response.body()
        )
        .into());
    }

    let rows: Vec<VerificationRow> = with_db_connection(|connection| {
        let engine = connection.engine().ok_or(DbError::Closed)?;
        connection.execute_sql_file(
            select_person_id_sql(engine),
            &[SqlParam::from(HAPPY_PERSON_ID)],
        )
    })?;
    reporter.artifacts().write_json("verification_rows.json", &rows)?;
    if rows.len() != 1 {
        return Err(
            format!("expected one row for personId {HAPPY_PERSON_ID}, found {}", rows.len()).into()
        );
    }
    if rows[0].get("personId") != Some(&Value::from(HAPPY_PERSON_ID)) {
        return Err(format!("row does not match personId {HAPPY_PERSON_ID}").into());
    }
    Ok(())
}
