//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod customer_directory;
pub mod event_notifier;
pub mod progress;
