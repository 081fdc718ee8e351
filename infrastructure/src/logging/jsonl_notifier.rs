//! JSONL file writer for orchestration events.
//!
//! Each [`OrchestrationEvent`] is serialized as a single JSON line: the
//! payload fields flattened next to `type` and an RFC 3339 `timestamp`,
//! appended to the file via a buffered writer.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use triage_application::{EventNotifier, NotifyError, OrchestrationEvent};

/// JSONL event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and
/// on `Drop`.
pub struct JsonlEventNotifier {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventNotifier {
    /// Open the log for appending, creating the file and parent
    /// directories if they don't exist.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, NotifyError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!("Writing orchestration events to {}", path.display());

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &OrchestrationEvent) -> Value {
        let timestamp = event
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut map = match &event.payload {
            Value::Object(fields) => fields.clone(),
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other.clone());
                map
            }
        };
        map.insert(
            "type".to_string(),
            Value::String(event.event_type.as_str().to_string()),
        );
        map.insert("timestamp".to_string(), Value::String(timestamp));
        Value::Object(map)
    }
}

#[async_trait]
impl EventNotifier for JsonlEventNotifier {
    async fn publish(&self, event: &OrchestrationEvent) -> Result<(), NotifyError> {
        let line = serde_json::to_string(&Self::record(event))?;

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        // JSONL is append-only; flush each line for crash safety
        writer.flush()?;
        Ok(())
    }
}

impl Drop for JsonlEventNotifier {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
