//! Agent-facing value objects.
//!
//! - [`AgentResponse`]: what every guarded agent call returns
//! - [`FailureKind`]: failure classification carried by a failed response

pub mod response;

pub use response::{AgentResponse, FailureKind};
