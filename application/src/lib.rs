//! Application layer for triage
//!
//! This crate contains the agents, guarded execution, use cases, port
//! definitions, and application configuration. It depends only on the
//! domain layer.

pub mod agents;
pub mod config;
pub mod execution;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::{
    Agent, ComplianceAgent, FraudAgent, InsightsAgent, KbAgent, StepInput, SummaryAgent,
};
pub use config::OrchestratorConfig;
pub use execution::{ExecutionError, GuardedAgent, RetryExecutor};
pub use ports::{
    customer_directory::{
        CustomerDirectory, DirectoryError, EmptyDirectory, OtpQuota, UnlimitedOtpQuota,
    },
    event_notifier::{
        EventNotifier, EventType, NoEventNotifier, NotifyError, OrchestrationEvent,
    },
    progress::{BatchProgressNotifier, NoProgress},
};
pub use use_cases::assess_batch::AssessBatchUseCase;
pub use use_cases::orchestrate::{
    BuildError, ORCHESTRATOR_BREAKER, Orchestrator, OrchestratorBuilder,
};
