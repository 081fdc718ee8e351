//! Infrastructure layer for triage
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod data;
pub mod logging;
pub mod notify;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigSource, FileConfig};
pub use data::{
    CustomerDataError, InMemoryCustomerDirectory, InMemoryOtpQuota, KnowledgeBaseError,
    KnowledgeBaseLoader,
};
pub use logging::JsonlEventNotifier;
pub use notify::{BroadcastNotifier, CompositeNotifier};
