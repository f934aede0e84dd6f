//! Lazy loader for timeline photo payloads.
//!
//! Payloads stay out of list responses; an entry only advertises one via
//! `has_photo`. When the entry's element nears the viewport the consumer
//! calls [`PhotoLoader::load`] once, and the loader walks the states
//! unloaded -> triggered -> loading -> loaded: the trigger is consumed on
//! first use, the blob cache is consulted before the network, and a loaded
//! id never fetches again within the session.
//!
//! Cached blobs are keyed by entry id alone and never invalidated, so an
//! entry whose photo is replaced remotely keeps serving the cached payload
//! on this device.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::warn;

use crate::cache::CacheStore;
use crate::logger::EventLog;
use crate::models::TimelineEntry;
use crate::remote::{RemoteStore, SelectQuery};
use crate::store::{Collection, Entity};

/// Sink action for photo fetches
const PHOTO_ACTION: &str = "timeline.photo";

pub struct PhotoLoader {
    timeline: Collection<TimelineEntry>,
    remote: Arc<dyn RemoteStore>,
    cache: Arc<CacheStore>,
    events: EventLog,
    /// Ids whose visibility trigger has fired this session
    requested: Mutex<HashSet<String>>,
}

impl PhotoLoader {
    pub(crate) fn new(
        timeline: Collection<TimelineEntry>,
        remote: Arc<dyn RemoteStore>,
        cache: Arc<CacheStore>,
        events: EventLog,
    ) -> Self {
        Self {
            timeline,
            remote,
            cache,
            events,
            requested: Mutex::new(HashSet::new()),
        }
    }

    /// Visibility trigger for one entry. Call when the entry's element
    /// crosses the near-viewport threshold; only the first call per id does
    /// anything.
    ///
    /// No-op when the entry is unknown, has no remote photo, or already
    /// carries its payload. Failures go to the sink and the consumer keeps
    /// its placeholder.
    pub async fn load(&self, id: &str) {
        let wants_photo = self
            .timeline
            .snapshot()
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.has_photo && entry.photo.is_none());
        if wants_photo != Some(true) {
            return;
        }

        {
            let Ok(mut requested) = self.requested.lock() else {
                return;
            };
            // Consume the trigger: later calls for this id are no-ops
            if !requested.insert(id.to_string()) {
                return;
            }
        }

        if let Some(payload) = self.cache.get_blob(id) {
            self.apply(id, payload);
            return;
        }

        let query = SelectQuery::all().columns("photo").filter_eq("id", id);
        match self.remote.select(TimelineEntry::TABLE, query).await {
            Ok(rows) => {
                let payload = rows
                    .first()
                    .and_then(|row| row.get("photo"))
                    .and_then(Value::as_str)
                    .map(String::from);
                match payload {
                    Some(payload) => {
                        self.cache.put_blob(id, &payload);
                        self.apply(id, payload);
                        self.events
                            .info(PHOTO_ACTION, None, Some(json!({"id": id})));
                    }
                    None => {
                        warn!(id, "Entry advertised a photo but the backend returned none");
                        self.events.error(
                            PHOTO_ACTION,
                            Some("no payload in photo response"),
                            Some(json!({"id": id})),
                        );
                    }
                }
            }
            Err(e) => {
                self.events.error(
                    PHOTO_ACTION,
                    Some(&e.to_string()),
                    Some(json!({"id": id, "code": e.code()})),
                );
            }
        }
    }

    fn apply(&self, id: &str, payload: String) {
        self.timeline.patch_state(|list| {
            if let Some(entry) = list.iter_mut().find(|entry| entry.id == id) {
                entry.photo = Some(payload);
            }
        });
    }
}
