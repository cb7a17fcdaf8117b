// system-tests/tests/suites/sad_paths.rs
// ============================================================================
// Module: Import Sad Paths
// Description: Live negative validation cases driven by a JSON fixture.
// Purpose: Confirm invalid person ids are rejected with expected statuses.
// Dependencies: system-tests helpers, import-harness
// ============================================================================

//! Negative validation scenarios for the live environment.

use import_harness::cases::CaseFields;
use import_harness::cases::TestCase;
use import_harness::cases::load_cases;
use import_harness::fixtures::api_client;
use serde::Serialize;
use serde_json::Value;
use system_tests::artifacts::TestReporter;
use system_tests::config::NEGATIVE_CASES_FIXTURE;
use system_tests::config::SystemTestConfig;
use system_tests::config::fixture_path;

use crate::helpers;

/// Observed outcome of one case.
#[derive(Debug, Serialize)]
struct CaseOutcome {
    argument: Value,
    expected_status: u16,
    actual_status: u16,
    body: String,
}

#[test]
fn negative_cases_return_expected_statuses() -> Result<(), Box<dyn std::error::Error>> {
    helpers::init_logging();
    let config = SystemTestConfig::load()?;
    let mut reporter = TestReporter::new(&config, "negative_cases_return_expected_statuses")?;

    let outcomes = match replay_cases(&reporter) {
        Ok(outcomes) => outcomes,
        Err(err) => {
            let artifacts = vec!["import_transcript.json".to_string()];
            return Err(reporter.fail(err.to_string(), artifacts));
        }
    };
    let mismatches: Vec<String> = outcomes
        .iter()
        .filter(|outcome| outcome.actual_status != outcome.expected_status)
        .map(|outcome| {
            format!(
                "personId {}: expected {}, got {}",
                outcome.argument, outcome.expected_status, outcome.actual_status
            )
        })
        .collect();
    if !mismatches.is_empty() {
        return Err(reporter.fail(
            format!("status mismatches:\n{}", mismatches.join("\n")),
            vec!["case_outcomes.json".to_string()],
        ));
    }

    reporter.finish(
        "pass",
        vec![format!("{} negative cases matched", outcomes.len())],
        vec![
            "summary.json".to_string(),
            "summary.md".to_string(),
            "import_transcript.json".to_string(),
            "case_outcomes.json".to_string(),
        ],
    )?;
    drop(reporter);
    Ok(())
}

/// Sends every fixture case and records what came back.
fn replay_cases(reporter: &TestReporter) -> Result<Vec<CaseOutcome>, Box<dyn std::error::Error>> {
    let cases: Vec<TestCase<Value>> =
        load_cases(fixture_path(NEGATIVE_CASES_FIXTURE), &CaseFields::default())?;
    if cases.is_empty() {
        return Err(format!("{NEGATIVE_CASES_FIXTURE} holds no cases").into());
    }

    let client = api_client()?;
    let mut outcomes = Vec::with_capacity(cases.len());
    for case in cases {
        let response = client.post_import_value(case.argument.clone())?;
        outcomes.push(CaseOutcome {
            argument: case.argument,
            expected_status: case.expected_status,
            actual_status: response.status(),
            body: response.body().to_string(),
        });
    }
    reporter.artifacts().write_json("import_transcript.json", &client.transcript())?;
    reporter.artifacts().write_json("case_outcomes.json", &outcomes)?;
    Ok(outcomes)
}
