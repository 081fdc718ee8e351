//! Agent response value object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Why a step failed; drives breaker accounting and plan reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Admission denied by an open breaker
    CircuitOpen,
    /// Guardrail rejection or compliance refusal
    PolicyViolation,
    /// Timeout or connection failure that survived all retries
    Transient,
    /// Non-retryable failure inside the agent
    Fatal,
    /// Unknown step or agent wiring error
    Configuration,
    /// The run was cancelled while the step was in flight
    Cancelled,
    /// The request itself was malformed
    InvalidRequest,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::CircuitOpen => "circuit_open",
            FailureKind::PolicyViolation => "policy_violation",
            FailureKind::Transient => "transient",
            FailureKind::Fatal => "fatal",
            FailureKind::Configuration => "configuration",
            FailureKind::Cancelled => "cancelled",
            FailureKind::InvalidRequest => "invalid_request",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one guarded agent call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<FailureKind>,
}

impl AgentResponse {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: BTreeMap::new(),
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            metadata: BTreeMap::new(),
            failure: Some(kind),
        }
    }

    /// Attach a metadata entry (builder style, consumes self)
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<Value> {
        self.data
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let r = AgentResponse::success(json!({"score": 0.3})).with_metadata("attempts", 1);
        assert!(r.is_success());
        assert_eq!(r.data(), Some(&json!({"score": 0.3})));
        assert!(r.error().is_none());
        assert!(r.failure_kind().is_none());
        assert_eq!(r.metadata()["attempts"], json!(1));
    }

    #[test]
    fn test_failure_response() {
        let r = AgentResponse::failure(FailureKind::CircuitOpen, "circuit breaker open for kb");
        assert!(!r.is_success());
        assert!(r.data().is_none());
        assert_eq!(r.error(), Some("circuit breaker open for kb"));
        assert_eq!(r.failure_kind(), Some(FailureKind::CircuitOpen));
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let r = AgentResponse::failure(FailureKind::Fatal, "boom");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            json!({"success": false, "error": "boom", "failure": "fatal"})
        );
    }
}
