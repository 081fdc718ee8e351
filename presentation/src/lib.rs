//! Presentation layer for triage
//!
//! This crate contains CLI definitions, output formatters and progress
//! reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::{console::ConsoleFormatter, set_color_enabled};
pub use progress::reporter::{BatchProgressReporter, SimpleBatchProgress};
