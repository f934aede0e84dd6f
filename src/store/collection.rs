//! Generic cache-first collection façade.
//!
//! One `Collection` instance fronts each backend table. Reads are
//! cache-first: the seeded consumer-visible state and `cached()` cost no
//! network, while `list()` refreshes from the remote and overwrites the
//! snapshot wholesale. Mutations apply optimistically to consumer-visible
//! state before the remote call and resynchronize on failure; none of the
//! operations ever surface a backend error to the consumer.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tokio::sync::watch;
use tracing::warn;

use crate::cache::CacheStore;
use crate::logger::EventLog;
use crate::remote::{Direction, RemoteError, RemoteStore, SelectQuery};

/// A domain entity managed by a [`Collection`].
///
/// Implementations define the backend table, the cache snapshot key, the
/// wire-row mapping, and the collection's sort rule.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Wire-row shape returned by the backend
    type Row: DeserializeOwned + Send;

    /// Backend table name
    const TABLE: &'static str;
    /// Cache snapshot key
    const CACHE_KEY: &'static str;
    /// Action prefix for sink events, e.g. `timeline` in `timeline.add`
    const ACTION: &'static str;
    /// Projection for list selects
    const LIST_COLUMNS: &'static str;

    /// Remote list ordering, matching the collection's sort rule.
    fn list_order() -> (&'static str, Direction);

    fn id(&self) -> &str;

    fn from_row(row: Self::Row) -> Self;

    /// Columns written on insert.
    fn insert_row(&self) -> Value;

    /// Columns written on update.
    fn update_patch(&self) -> Value;

    /// Insert `item` into an optimistic local list per the collection's
    /// sort rule.
    fn place(list: &mut Vec<Self>, item: Self);
}

pub struct Collection<E: Entity> {
    remote: Arc<dyn RemoteStore>,
    cache: Arc<CacheStore>,
    events: EventLog,
    state: watch::Sender<Vec<E>>,
}

impl<E: Entity> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            cache: self.cache.clone(),
            events: self.events.clone(),
            state: self.state.clone(),
        }
    }
}

impl<E: Entity> Collection<E> {
    pub(crate) fn new(
        remote: Arc<dyn RemoteStore>,
        cache: Arc<CacheStore>,
        events: EventLog,
    ) -> Self {
        // Seed consumer-visible state from the last persisted snapshot so
        // views render immediately while the first refresh is in flight
        let initial = cache.get::<Vec<E>>(E::CACHE_KEY).unwrap_or_default();
        let (state, _) = watch::channel(initial);

        Self {
            remote,
            cache,
            events,
            state,
        }
    }

    /// Last persisted snapshot. Synchronous, no network access; absent if no
    /// list has ever succeeded.
    pub fn cached(&self) -> Option<Vec<E>> {
        self.cache.get(E::CACHE_KEY)
    }

    /// Current consumer-visible list, optimistic edits included.
    pub fn snapshot(&self) -> Vec<E> {
        self.state.borrow().clone()
    }

    /// Observe consumer-visible state changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<E>> {
        self.state.subscribe()
    }

    /// Fetch the authoritative list. On success the cache snapshot and the
    /// consumer-visible state are replaced wholesale. On failure the last
    /// snapshot (or an empty list) stands in; the error goes to the sink,
    /// never to the caller.
    pub async fn list(&self) -> Vec<E> {
        let (column, direction) = E::list_order();
        let query = SelectQuery::all()
            .columns(E::LIST_COLUMNS)
            .order(column, direction);

        match self.remote.select(E::TABLE, query).await {
            Ok(rows) => {
                let items = decode_rows::<E>(rows);
                self.cache.set(E::CACHE_KEY, &items);
                self.state.send_replace(items.clone());
                self.events.info(
                    &action(E::ACTION, "list"),
                    None,
                    Some(json!({"count": items.len()})),
                );
                items
            }
            Err(e) => {
                self.log_failure("list", None, &e);
                let fallback = self.cached().unwrap_or_default();
                self.state.send_replace(fallback.clone());
                fallback
            }
        }
    }

    /// Optimistically insert per the collection's sort rule, then confirm
    /// with the backend. A failed insert resynchronizes, dropping the
    /// optimistic item if the remote never received it.
    pub async fn add(&self, item: E) {
        let id = item.id().to_string();
        let row = item.insert_row();
        self.state.send_modify(|list| E::place(list, item));

        match self.remote.insert(E::TABLE, vec![row]).await {
            Ok(()) => self
                .events
                .info(&action(E::ACTION, "add"), None, Some(json!({"id": id}))),
            Err(e) => {
                self.log_failure("add", Some(&id), &e);
                self.list().await;
            }
        }
    }

    /// Optimistically replace the matching-id element (no re-sort), then
    /// confirm with the backend. A failed update resynchronizes.
    pub async fn update(&self, item: E) {
        let id = item.id().to_string();
        let patch = item.update_patch();
        self.state.send_modify(|list| {
            if let Some(slot) = list.iter_mut().find(|existing| existing.id() == id) {
                *slot = item;
            }
        });

        match self.remote.update(E::TABLE, &id, patch).await {
            Ok(()) => self
                .events
                .info(&action(E::ACTION, "update"), None, Some(json!({"id": id}))),
            Err(e) => {
                self.log_failure("update", Some(&id), &e);
                self.list().await;
            }
        }
    }

    /// Optimistically remove the matching-id element, then confirm with the
    /// backend. A failed delete resynchronizes.
    pub async fn delete(&self, id: &str) {
        self.state
            .send_modify(|list| list.retain(|existing| existing.id() != id));

        match self.remote.delete(E::TABLE, id).await {
            Ok(()) => self
                .events
                .info(&action(E::ACTION, "delete"), None, Some(json!({"id": id}))),
            Err(e) => {
                self.log_failure("delete", Some(id), &e);
                self.list().await;
            }
        }
    }

    /// Patch consumer-visible state without touching the snapshot cache.
    /// Used by the photo loader, which caches payloads separately.
    pub(crate) fn patch_state(&self, mutate: impl FnOnce(&mut Vec<E>)) {
        self.state.send_modify(mutate);
    }

    fn log_failure(&self, op: &str, id: Option<&str>, error: &RemoteError) {
        let mut details = json!({"code": error.code()});
        if let Some(id) = id {
            details["id"] = json!(id);
        }
        self.events.error(
            &action(E::ACTION, op),
            Some(&error.to_string()),
            Some(details),
        );
    }
}

fn action(prefix: &str, op: &str) -> String {
    format!("{}.{}", prefix, op)
}

/// Decode backend rows into entities, skipping rows that fail to decode.
fn decode_rows<E: Entity>(rows: Vec<Value>) -> Vec<E> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<E::Row>(row) {
            Ok(row) => Some(E::from_row(row)),
            Err(e) => {
                warn!(table = E::TABLE, error = %e, "Skipping undecodable row");
                None
            }
        })
        .collect()
}
