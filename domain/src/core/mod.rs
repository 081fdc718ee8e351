//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`validation::ConfigIssue`]: structured configuration warnings

pub mod error;
pub mod validation;
