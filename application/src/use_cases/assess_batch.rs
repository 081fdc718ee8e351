//! Assess batch use case
//!
//! Runs many requests through one orchestrator with bounded concurrency.
//! Outcomes are reported in input order; progress callbacks fire in
//! completion order.

use super::orchestrate::Orchestrator;
use crate::config::{DEFAULT_BATCH_CONCURRENCY, DEFAULT_MAX_BATCH_SIZE, OrchestratorConfig};
use crate::ports::event_notifier::{OrchestrationEvent, publish_best_effort};
use crate::ports::progress::{BatchProgressNotifier, NoProgress};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use triage_domain::{BatchReport, DomainError, PlanOutcome, PlanRequest};

pub struct AssessBatchUseCase {
    orchestrator: Arc<Orchestrator>,
    concurrency: usize,
    max_batch_size: usize,
}

impl AssessBatchUseCase {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            concurrency: DEFAULT_BATCH_CONCURRENCY,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn from_config(orchestrator: Arc<Orchestrator>, config: &OrchestratorConfig) -> Self {
        Self::new(orchestrator)
            .with_concurrency(config.batch_concurrency)
            .with_max_batch_size(config.max_batch_size)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_max_batch_size(mut self, size: usize) -> Self {
        self.max_batch_size = size;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, requests: Vec<PlanRequest>) -> Result<BatchReport, DomainError> {
        self.execute_with_progress(requests, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute with progress callbacks and cancellation.
    ///
    /// Each request is an independent run; one failing never stops the
    /// others. A cancelled batch still returns a report, with the
    /// unfinished runs marked cancelled.
    pub async fn execute_with_progress(
        &self,
        requests: Vec<PlanRequest>,
        progress: &dyn BatchProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<BatchReport, DomainError> {
        if requests.len() > self.max_batch_size {
            return Err(DomainError::BatchTooLarge {
                size: requests.len(),
                limit: self.max_batch_size,
            });
        }

        info!(
            "Assessing batch of {} request(s), concurrency {}",
            requests.len(),
            self.concurrency
        );
        progress.on_batch_start(requests.len());

        let orchestrator = self.orchestrator.as_ref();
        let outcomes: Vec<PlanOutcome> = stream::iter(requests.into_iter().enumerate())
            .map(|(index, request)| async move {
                let outcome = orchestrator.run_with_cancel(request, cancel).await;
                progress.on_item_complete(index, &outcome);
                outcome
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let report = BatchReport::from_outcomes(outcomes);
        info!(
            "Batch done: {} processed, {} successful, {} failed",
            report.processed, report.successful, report.failed
        );

        publish_best_effort(
            orchestrator.notifier().as_ref(),
            OrchestrationEvent::batch_completed(report.processed, report.successful, report.failed),
        )
        .await;
        progress.on_batch_complete(&report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::{Agent, StepInput};
    use crate::ports::event_notifier::{EventNotifier, EventType, NotifyError};
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use triage_domain::{CallError, FailureKind, SanitizedInputs};

    /// Sleeps longer for earlier customers so completion order is reversed;
    /// fails for customers named "bad".
    struct EchoAgent {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl EchoAgent {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Agent for EchoAgent {
        fn name(&self) -> &str {
            "fraud"
        }

        fn arguments(&self, input: &StepInput<'_>) -> Vec<Value> {
            vec![json!(input.request.customer_id)]
        }

        async fn call(&self, args: &SanitizedInputs) -> Result<Value, CallError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let customer = args.get(0).and_then(Value::as_str).unwrap_or_default().to_string();
            let rank: u64 = customer.trim_start_matches("cust_").parse().unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(100 - rank.min(99))).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if customer == "bad" {
                return Err(CallError::fatal("profile corrupt"));
            }
            Ok(json!({ "customer": customer }))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: Mutex<Option<usize>>,
        completed: Mutex<Vec<usize>>,
        finished: Mutex<bool>,
    }

    impl BatchProgressNotifier for RecordingProgress {
        fn on_batch_start(&self, total: usize) {
            *self.started.lock().unwrap() = Some(total);
        }

        fn on_item_complete(&self, index: usize, _outcome: &PlanOutcome) {
            self.completed.lock().unwrap().push(index);
        }

        fn on_batch_complete(&self, _report: &BatchReport) {
            *self.finished.lock().unwrap() = true;
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<OrchestrationEvent>>,
    }

    #[async_trait]
    impl EventNotifier for RecordingNotifier {
        async fn publish(&self, event: &OrchestrationEvent) -> Result<(), NotifyError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    fn requests(customers: &[&str]) -> Vec<PlanRequest> {
        customers
            .iter()
            .map(|c| PlanRequest::new("check", *c).with_plan(["fraud"]))
            .collect()
    }

    fn use_case(agent: Arc<EchoAgent>, notifier: Arc<RecordingNotifier>) -> AssessBatchUseCase {
        let orchestrator = Orchestrator::builder(OrchestratorConfig::default())
            .with_agent(agent)
            .with_notifier(notifier)
            .build()
            .unwrap();
        AssessBatchUseCase::new(Arc::new(orchestrator))
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_keep_input_order() {
        let uc = use_case(EchoAgent::new(), Arc::default());
        let report = uc
            .execute(requests(&["cust_1", "cust_2", "cust_3", "cust_4"]))
            .await
            .unwrap();

        assert_eq!(report.processed, 4);
        assert_eq!(report.successful, 4);
        let customers: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| o.result("fraud").unwrap()["customer"].as_str().unwrap())
            .collect();
        assert_eq!(customers, vec!["cust_1", "cust_2", "cust_3", "cust_4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_isolated() {
        let uc = use_case(EchoAgent::new(), Arc::default());
        let report = uc
            .execute(requests(&["cust_1", "bad", "cust_3"]))
            .await
            .unwrap();

        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.outcomes[1].success);
        assert_eq!(report.outcomes[1].failure, Some(FailureKind::Fatal));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let agent = EchoAgent::new();
        let uc = use_case(agent.clone(), Arc::default()).with_concurrency(2);
        let customers: Vec<String> = (1..=6).map(|i| format!("cust_{}", i)).collect();
        let refs: Vec<&str> = customers.iter().map(String::as_str).collect();

        uc.execute(requests(&refs)).await.unwrap();

        assert_eq!(agent.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_batch_rejected() {
        let uc = use_case(EchoAgent::new(), Arc::default()).with_max_batch_size(2);
        let err = uc
            .execute(requests(&["cust_1", "cust_2", "cust_3"]))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::BatchTooLarge { size: 3, limit: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_and_batch_event() {
        let notifier = Arc::new(RecordingNotifier::default());
        let uc = use_case(EchoAgent::new(), notifier.clone());
        let progress = RecordingProgress::default();

        let report = uc
            .execute_with_progress(
                requests(&["cust_1", "cust_50"]),
                &progress,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(*progress.started.lock().unwrap(), Some(2));
        // cust_50 sleeps less, so it finishes first
        assert_eq!(*progress.completed.lock().unwrap(), vec![1, 0]);
        assert!(*progress.finished.lock().unwrap());

        let events = notifier.events.lock().unwrap();
        let last = events.last().unwrap();
        assert_eq!(last.event_type, EventType::BatchCompleted);
        assert_eq!(last.payload["processed"], report.processed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch() {
        let uc = use_case(EchoAgent::new(), Arc::default());
        let report = uc.execute(vec![]).await.unwrap();
        assert_eq!(report.processed, 0);
        assert!(report.outcomes.is_empty());
    }
}
