//! Configuration validation issues.
//!
//! Configuration loaders report problems as [`ConfigIssue`] values rather
//! than failing outright. `Warning` issues fall back to a default value;
//! `Error` issues make the configuration unusable.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but a default was substituted.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A numeric value is outside its accepted range.
    OutOfRange { field: String, value: String },
    /// A guardrail pattern does not compile as a regular expression.
    InvalidPattern { field: String, pattern: String },
    /// A referenced data file does not exist.
    MissingFile { field: String, path: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
