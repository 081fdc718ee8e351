//! Logging infrastructure: the structured orchestration event log.
//!
//! Provides [`JsonlEventNotifier`], a JSONL file writer that implements
//! the [`EventNotifier`](triage_application::EventNotifier) port.

mod jsonl_notifier;

pub use jsonl_notifier::JsonlEventNotifier;
