//! Progress notification port
//!
//! Defines the interface for reporting progress while a batch runs.

use triage_domain::{BatchReport, PlanOutcome};

/// Callback for progress updates during batch assessment
///
/// Implementations live in the presentation layer (e.g. a progress bar).
pub trait BatchProgressNotifier: Send + Sync {
    /// Called once before any request runs
    fn on_batch_start(&self, total: usize);

    /// Called as each request finishes (in completion order)
    fn on_item_complete(&self, index: usize, outcome: &PlanOutcome);

    /// Called after the report is assembled
    fn on_batch_complete(&self, _report: &BatchReport) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl BatchProgressNotifier for NoProgress {
    fn on_batch_start(&self, _total: usize) {}
    fn on_item_complete(&self, _index: usize, _outcome: &PlanOutcome) {}
}
