// crates/import-harness/src/client/transcript.rs
// ============================================================================
// Module: Exchange Transcript
// Description: Ordered record of auth and import HTTP exchanges.
// Dependencies: serde, serde_json
// ============================================================================

use std::fmt::Display;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

/// Which call produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeKind {
    /// Token request against the auth URL.
    Auth,
    /// Import request against `{base_url}/import`.
    Import,
}

/// One recorded HTTP exchange. Secrets are masked before recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// Call kind.
    pub kind: ExchangeKind,
    /// Target URL.
    pub url: String,
    /// Request body as sent (credentials masked).
    pub request: Value,
    /// HTTP status, absent on transport failure.
    pub status: Option<u16>,
    /// Response body, JSON when parseable.
    pub response: Value,
    /// Failure description, if the exchange failed.
    pub error: Option<String>,
}

/// Shared, append-only transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Recorded entries.
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl Transcript {
    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Appends an exchange.
    pub(crate) fn record(
        &self,
        kind: ExchangeKind,
        url: &str,
        request: Value,
        status: Option<u16>,
        response: Value,
        error: Option<String>,
    ) {
        let Ok(mut guard) = self.entries.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            kind,
            url: url.to_string(),
            request,
            status,
            response,
            error,
        });
    }

    /// Appends an exchange that failed before a response arrived.
    pub(crate) fn record_failure(
        &self,
        kind: ExchangeKind,
        url: &str,
        request: Value,
        error: &impl Display,
    ) {
        self.record(kind, url, request, None, Value::Null, Some(error.to_string()));
    }
}

/// Parses a response body as JSON, falling back to a string value.
pub(crate) fn body_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
