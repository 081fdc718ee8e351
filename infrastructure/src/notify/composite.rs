//! Composite notifier publishing to several sinks.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use triage_application::{EventNotifier, NotifyError, OrchestrationEvent};

/// Publishes every event to each sink in order.
///
/// A failing sink does not stop delivery to the rest; the failures are
/// reported together once every sink has been tried.
#[derive(Default)]
pub struct CompositeNotifier {
    sinks: Vec<Arc<dyn EventNotifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn EventNotifier>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl EventNotifier for CompositeNotifier {
    async fn publish(&self, event: &OrchestrationEvent) -> Result<(), NotifyError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.publish(event).await {
                debug!("Sink rejected {} event: {}", event.event_type, e);
                failures.push(e.to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Unavailable(format!(
                "{} of {} sinks failed: {}",
                failures.len(),
                self.sinks.len(),
                failures.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::BroadcastNotifier;

    struct FailingSink;

    #[async_trait]
    impl EventNotifier for FailingSink {
        async fn publish(&self, _event: &OrchestrationEvent) -> Result<(), NotifyError> {
            Err(NotifyError::Unavailable("closed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_other_sinks() {
        let broadcast = Arc::new(BroadcastNotifier::default());
        let mut rx = broadcast.subscribe();
        let composite = CompositeNotifier::new()
            .with(Arc::new(FailingSink))
            .with(broadcast.clone());

        let err = composite
            .publish(&OrchestrationEvent::system_reset(&[]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("1 of 2 sinks failed"));
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_composite_is_ok() {
        let composite = CompositeNotifier::new();
        assert!(composite.is_empty());
        assert!(
            composite
                .publish(&OrchestrationEvent::batch_completed(0, 0, 0))
                .await
                .is_ok()
        );
    }
}
