//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod assess_batch;
pub mod orchestrate;
