// system-tests/src/artifacts/reporter.rs
// ============================================================================
// Module: Test Artifacts
// Description: Artifact helpers for live import scenarios.
// Purpose: Create per-test run roots and write deterministic summaries.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! Every scenario ends with exactly one summary: `pass` or `fail` from the
//! scenario itself, `panic` or `unknown` from [`TestReporter`]'s drop.

use std::error::Error;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::config::SystemTestConfig;

/// Serialized form of `summary.json`.
#[derive(Debug, Serialize)]
struct TestSummary {
    /// Test function name.
    test_name: String,
    /// Target environment name.
    environment: String,
    /// `pass`, `fail`, `panic`, or `unknown`.
    status: String,
    /// Start time in Unix milliseconds.
    started_at_ms: u128,
    /// End time in Unix milliseconds.
    ended_at_ms: u128,
    /// Wall-clock duration.
    duration_ms: u128,
    /// Free-form outcome notes.
    notes: Vec<String>,
    /// Artifact file names written for the test.
    artifacts: Vec<String>,
}

/// Current Unix time in milliseconds.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Timestamped run root under `target/system-tests`.
fn default_run_root() -> PathBuf {
    PathBuf::from("target/system-tests").join(format!("run_{}", now_millis()))
}

/// Artifact manager for a single system-test.
#[derive(Debug, Clone)]
pub struct TestArtifacts {
    /// Directory receiving this test's files.
    root: PathBuf,
}

impl TestArtifacts {
    /// Creates `<run root>/<test name>`.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn new(run_root: Option<PathBuf>, test_name: &str) -> io::Result<Self> {
        let root = run_root.unwrap_or_else(default_run_root).join(test_name);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
        })
    }

    /// Returns the root directory for the test artifacts.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a JSON artifact using canonical JCS serialization.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        fs::write(&path, bytes)?;
        Ok(path)
    }

    /// Writes a text artifact with UTF-8 encoding.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    pub fn write_text(&self, name: &str, value: &str) -> io::Result<PathBuf> {
        let path = self.root.join(name);
        fs::write(&path, value.as_bytes())?;
        Ok(path)
    }
}

/// Helper that writes summaries even when a test panics.
#[derive(Debug)]
pub struct TestReporter {
    /// Artifact directory for the test.
    artifacts: TestArtifacts,
    /// Test function name.
    test_name: String,
    /// Target environment name.
    environment: String,
    /// Start time in Unix milliseconds.
    started_at_ms: u128,
    /// Set once a summary has been written.
    finalized: bool,
}

impl TestReporter {
    /// Creates a reporter for the named test using the loaded run settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the artifact directory cannot be created.
    pub fn new(config: &SystemTestConfig, test_name: &str) -> io::Result<Self> {
        Ok(Self {
            artifacts: TestArtifacts::new(config.run_root.clone(), test_name)?,
            test_name: test_name.to_string(),
            environment: config.environment.as_str().to_string(),
            started_at_ms: now_millis(),
            finalized: false,
        })
    }

    /// Returns the artifact manager.
    #[must_use]
    pub const fn artifacts(&self) -> &TestArtifacts {
        &self.artifacts
    }

    /// Writes the final summary for the test.
    ///
    /// # Errors
    ///
    /// Returns an error when a summary file cannot be written.
    pub fn finish(
        &mut self,
        status: &str,
        notes: Vec<String>,
        artifacts: Vec<String>,
    ) -> io::Result<()> {
        let ended_at_ms = now_millis();
        let summary = TestSummary {
            test_name: self.test_name.clone(),
            environment: self.environment.clone(),
            status: status.to_string(),
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            notes,
            artifacts,
        };
        self.artifacts.write_json("summary.json", &summary)?;
        self.artifacts.write_text("summary.md", &summary_markdown(&summary))?;
        self.finalized = true;
        Ok(())
    }

    /// Writes a `fail` summary and returns `message` as the test error.
    pub fn fail(&mut self, message: String, artifacts: Vec<String>) -> Box<dyn Error> {
        match self.finish("fail", vec![message.clone()], artifacts) {
            Ok(()) => message.into(),
            Err(err) => format!("{message} (summary not written: {err})").into(),
        }
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let _ = self.finish(
            status,
            vec!["test terminated without explicit summary".to_string()],
            Vec::new(),
        );
    }
}

/// Renders `summary.md`.
fn summary_markdown(summary: &TestSummary) -> String {
    let mut out = String::new();
    out.push_str("# Import System-Test Summary\n\n");
    out.push_str("## Status\n\n");
    let _ = writeln!(out, "- Test: {}", summary.test_name);
    let _ = writeln!(out, "- Environment: {}", summary.environment);
    let _ = writeln!(out, "- Status: {}", summary.status);
    let _ = writeln!(out, "- Duration (ms): {}", summary.duration_ms);
    push_list(&mut out, "Notes", &summary.notes);
    push_list(&mut out, "Artifacts", &summary.artifacts);
    out
}

/// Appends a markdown list section.
fn push_list(out: &mut String, heading: &str, items: &[String]) {
    let _ = write!(out, "\n## {heading}\n\n");
    if items.is_empty() {
        out.push_str("- None\n");
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}
