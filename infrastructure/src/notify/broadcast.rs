//! Broadcast notifier backed by a tokio broadcast channel.
//!
//! Subscribers that fall more than `capacity` events behind see
//! `RecvError::Lagged` and skip ahead; a slow subscriber never blocks a run.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;
use triage_application::{EventNotifier, NotifyError, OrchestrationEvent};

pub const DEFAULT_CAPACITY: usize = 256;

pub struct BroadcastNotifier {
    sender: broadcast::Sender<OrchestrationEvent>,
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<OrchestrationEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl EventNotifier for BroadcastNotifier {
    async fn publish(&self, event: &OrchestrationEvent) -> Result<(), NotifyError> {
        // Nobody listening is not an error
        if self.sender.send(event.clone()).is_err() {
            trace!("No subscribers for {} event", event.event_type);
        }
        Ok(())
    }
}
