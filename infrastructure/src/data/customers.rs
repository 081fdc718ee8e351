//! In-memory customer directory loaded from JSON fixtures.
//!
//! Recent activity is windowed relative to the customer's newest
//! timestamped transaction, not the wall clock, so fixtures give the same
//! answer whenever they are read.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use triage_application::{CustomerDirectory, DirectoryError};
use triage_domain::{CustomerProfile, Transaction};

#[derive(Error, Debug)]
pub enum CustomerDataError {
    #[error("failed to read customer data {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid customer data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// On-disk fixture layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerFixtures {
    pub profiles: Vec<CustomerProfile>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Default)]
pub struct InMemoryCustomerDirectory {
    profiles: HashMap<String, CustomerProfile>,
    transactions: HashMap<String, Vec<Transaction>>,
}

impl InMemoryCustomerDirectory {
    pub fn new(fixtures: CustomerFixtures) -> Self {
        let profiles = fixtures
            .profiles
            .into_iter()
            .map(|p| (p.customer_id.clone(), p))
            .collect();

        let mut transactions: HashMap<String, Vec<Transaction>> = HashMap::new();
        for txn in fixtures.transactions {
            transactions
                .entry(txn.customer_id.clone())
                .or_default()
                .push(txn);
        }

        Self {
            profiles,
            transactions,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CustomerDataError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_file(path: &Path) -> Result<Self, CustomerDataError> {
        let json = std::fs::read_to_string(path).map_err(|source| CustomerDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json(&json)?;
        info!(
            "Loaded {} customer profile(s) from {}",
            directory.profiles.len(),
            path.display()
        );
        Ok(directory)
    }

    pub fn customer_count(&self) -> usize {
        self.profiles.len()
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` read as UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn within_window(transactions: &[Transaction], window: Duration) -> Vec<Transaction> {
    let stamped: Vec<(Option<DateTime<Utc>>, &Transaction)> = transactions
        .iter()
        .map(|t| (t.timestamp.as_deref().and_then(parse_timestamp), t))
        .collect();

    let cutoff = stamped
        .iter()
        .filter_map(|(ts, _)| *ts)
        .max()
        .and_then(|newest| {
            chrono::Duration::from_std(window)
                .ok()
                .and_then(|w| newest.checked_sub_signed(w))
        });

    let mut recent: Vec<(Option<DateTime<Utc>>, &Transaction)> = stamped
        .into_iter()
        // Undated transactions cannot be placed outside the window
        .filter(|(ts, _)| match (ts, cutoff) {
            (Some(ts), Some(cutoff)) => *ts >= cutoff,
            _ => true,
        })
        .collect();
    recent.sort_by(|a, b| b.0.cmp(&a.0));
    recent.into_iter().map(|(_, t)| t.clone()).collect()
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn profile(&self, customer_id: &str) -> Result<Option<CustomerProfile>, DirectoryError> {
        Ok(self.profiles.get(customer_id).cloned())
    }

    async fn recent_transactions(
        &self,
        customer_id: &str,
        window: Duration,
    ) -> Result<Vec<Transaction>, DirectoryError> {
        Ok(self
            .transactions
            .get(customer_id)
            .map(|txns| within_window(txns, window))
            .unwrap_or_default())
    }
}
