//! Sliding-window OTP quota kept in memory.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;
use triage_application::{DirectoryError, OtpQuota};

/// At most `max_requests` OTPs per customer in any `window`
pub struct InMemoryOtpQuota {
    max_requests: u32,
    window: Duration,
    issued: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl InMemoryOtpQuota {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Requests still available to `customer_id` right now
    pub fn remaining(&self, customer_id: &str) -> u32 {
        let now = Instant::now();
        let issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let used = issued
            .get(customer_id)
            .map(|times| times.iter().filter(|t| now.duration_since(**t) < self.window).count())
            .unwrap_or(0);
        self.max_requests.saturating_sub(used as u32)
    }
}

#[async_trait]
impl OtpQuota for InMemoryOtpQuota {
    async fn try_acquire(&self, customer_id: &str) -> Result<bool, DirectoryError> {
        let now = Instant::now();
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let times = issued.entry(customer_id.to_string()).or_default();

        while times
            .front()
            .is_some_and(|t| now.duration_since(*t) >= self.window)
        {
            times.pop_front();
        }

        if times.len() as u32 >= self.max_requests {
            debug!("OTP quota exhausted for {}", customer_id);
            return Ok(false);
        }
        times.push_back(now);
        Ok(true)
    }
}
