//! Input guardrails applied before any agent call.
//!
//! - [`GuardrailFilter`]: sanitizes every string in the call arguments and
//!   screens the result for instruction-override signatures
//! - [`GuardrailPolicy`]: tunables (length cap, extra signatures)

pub mod filter;

pub use filter::{GuardrailError, GuardrailFilter, GuardrailPolicy, SanitizedInputs};
