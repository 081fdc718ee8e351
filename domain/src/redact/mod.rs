//! PII redaction for rendered output.
//!
//! Masks card-like digit runs and e-mail addresses in every string of a
//! JSON value, recursing through arrays and objects. Object keys are left
//! untouched.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub const CARD_MASK: &str = "****REDACTED_CARD****";
pub const EMAIL_MASK: &str = "****REDACTED_EMAIL****";

// 13-16 digits, optionally grouped by single spaces or dashes.
static CARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d(?:[ -]?\d){12,15}\b").expect("card pattern is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Redactor;

impl Redactor {
    pub fn new() -> Self {
        Self
    }

    pub fn redact_text(&self, text: &str) -> String {
        let text = EMAIL.replace_all(text, EMAIL_MASK);
        CARD.replace_all(&text, CARD_MASK).into_owned()
    }

    pub fn redact(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.redact_text(&s)),
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.redact(v)).collect()),
            Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, self.redact(v))).collect())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_masks_card_numbers() {
        let r = Redactor::new();
        assert_eq!(
            r.redact_text("card 4111 1111 1111 1111 used"),
            format!("card {} used", CARD_MASK)
        );
        assert_eq!(r.redact_text("4111-1111-1111-1111"), CARD_MASK);
        assert_eq!(r.redact_text("5500000000000004"), CARD_MASK);
    }

    #[test]
    fn test_short_numbers_untouched() {
        let r = Redactor::new();
        assert_eq!(r.redact_text("txn_00999 for 2500"), "txn_00999 for 2500");
        assert_eq!(r.redact_text("mcc 6011"), "mcc 6011");
    }

    #[test]
    fn test_masks_email() {
        let r = Redactor::new();
        assert_eq!(
            r.redact_text("contact jane.doe@example.com today"),
            format!("contact {} today", EMAIL_MASK)
        );
    }

    #[test]
    fn test_recursive() {
        let r = Redactor::new();
        let value = json!({
            "note": "paid with 4111111111111111",
            "nested": [{"email": "a@b.io"}, 42],
            "amount": 10.5
        });
        let redacted = r.redact(value);
        assert_eq!(redacted["note"], json!(format!("paid with {}", CARD_MASK)));
        assert_eq!(redacted["nested"][0]["email"], json!(EMAIL_MASK));
        assert_eq!(redacted["nested"][1], json!(42));
        assert_eq!(redacted["amount"], json!(10.5));
    }
}
