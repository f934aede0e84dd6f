//! Best-effort remote logging sink.
//!
//! Data-layer operations report leveled events here. Events are queued in
//! memory and written to the `app_logs` table in batches: each enqueue
//! schedules a flush after a short debounce, so bursts of nearby events
//! coalesce into a single insert. A failed flush drops its batch - the sink
//! never surfaces errors and nothing depends on it for correctness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::remote::RemoteStore;

/// Debounce window before a queued event is flushed.
/// Long enough to coalesce a burst of CRUD events into one batch write.
const FLUSH_DELAY_MS: u64 = 500;

/// Backend table receiving log batches
const LOG_TABLE: &str = "app_logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub action: String,
    pub message: Option<String>,
    pub details: Option<Value>,
}

impl LogEvent {
    fn into_row(self) -> Value {
        json!({
            "level": self.level.as_str(),
            "action": self.action,
            "message": self.message,
            "details": self.details,
        })
    }
}

/// The sink. Explicitly owned by the composition root and cloned into each
/// façade; there is no ambient singleton.
#[derive(Clone)]
pub struct EventLog {
    inner: Arc<Inner>,
}

struct Inner {
    remote: Arc<dyn RemoteStore>,
    queue: Mutex<Vec<LogEvent>>,
    flushing: AtomicBool,
}

impl EventLog {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                remote,
                queue: Mutex::new(Vec::new()),
                flushing: AtomicBool::new(false),
            }),
        }
    }

    pub fn info(&self, action: &str, message: Option<&str>, details: Option<Value>) {
        self.enqueue(LogEvent {
            level: LogLevel::Info,
            action: action.to_string(),
            message: message.map(String::from),
            details,
        });
    }

    pub fn error(&self, action: &str, message: Option<&str>, details: Option<Value>) {
        self.enqueue(LogEvent {
            level: LogLevel::Error,
            action: action.to_string(),
            message: message.map(String::from),
            details,
        });
    }

    pub fn enqueue(&self, event: LogEvent) {
        if let Ok(mut queue) = self.inner.queue.lock() {
            queue.push(event);
        }

        // Debounced flush on the caller's runtime. Outside a runtime the
        // event simply waits for the next explicit flush.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let log = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(Duration::from_millis(FLUSH_DELAY_MS)).await;
                log.flush().await;
            });
        }
    }

    /// Drain the queue and write one batch. If another flush is already in
    /// flight this call is a no-op; a failed write drops the batch.
    pub async fn flush(&self) {
        if self.inner.flushing.swap(true, Ordering::SeqCst) {
            return;
        }

        let batch: Vec<LogEvent> = match self.inner.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        };

        if !batch.is_empty() {
            let rows: Vec<Value> = batch.into_iter().map(LogEvent::into_row).collect();
            if let Err(e) = self.inner.remote.insert(LOG_TABLE, rows).await {
                debug!(error = %e, "Dropped log batch");
            }
        }

        self.inner.flushing.store(false, Ordering::SeqCst);
    }
}
