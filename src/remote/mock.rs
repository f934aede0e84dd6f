//! In-memory remote store for exercising the façade in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{Direction, RemoteError, RemoteStore, SelectQuery};

/// Backend double with per-operation call counters and failure injection.
pub struct MockRemote {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    select_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tables: Mutex::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            select_calls: AtomicUsize::new(0),
            insert_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        })
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.tables
            .lock()
            .unwrap()
            .insert(table.to_string(), rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn injected() -> RemoteError {
        RemoteError::ServerError("injected failure".to_string())
    }
}

/// Stringify a JSON value for filter/order comparisons the way the backend
/// compares text and timestamp columns.
fn value_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn select(&self, table: &str, query: SelectQuery) -> Result<Vec<Value>, RemoteError> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let mut rows = self.rows(table);

        if let Some((column, value)) = &query.filter {
            rows.retain(|row| {
                row.get(column.as_str())
                    .map(|v| value_str(v) == *value)
                    .unwrap_or(false)
            });
        }

        if let Some((column, direction)) = &query.order {
            rows.sort_by_key(|row| row.get(column.as_str()).map(value_str).unwrap_or_default());
            if *direction == Direction::Descending {
                rows.reverse();
            }
        }

        if let Some(columns) = &query.columns {
            if columns != "*" {
                let keep: Vec<&str> = columns.split(',').map(str::trim).collect();
                rows = rows
                    .into_iter()
                    .map(|row| match row {
                        Value::Object(map) => Value::Object(
                            map.into_iter()
                                .filter(|(k, _)| keep.contains(&k.as_str()))
                                .collect(),
                        ),
                        other => other,
                    })
                    .collect();
            }
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<(), RemoteError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        // Backend tables default created_at to the insert time
        let rows = rows.into_iter().map(|mut row| {
            if let Some(map) = row.as_object_mut() {
                map.entry("created_at")
                    .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));
            }
            row
        });

        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .extend(rows);
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), RemoteError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let target = rows
            .iter_mut()
            .find(|row| row.get("id").map(|v| value_str(v) == id).unwrap_or(false));
        let Some(row) = target else {
            return Err(RemoteError::NotFound(format!("no row with id {}", id)));
        };

        if let (Some(row), Some(patch)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in patch {
                row.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), RemoteError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let before = rows.len();
        rows.retain(|row| row.get("id").map(|v| value_str(v) != id).unwrap_or(true));
        if rows.len() == before {
            return Err(RemoteError::NotFound(format!("no row with id {}", id)));
        }
        Ok(())
    }
}
