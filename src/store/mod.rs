//! Data access façade composing the remote client, the local cache, and the
//! logging sink.
//!
//! `MementoStore` is the composition root: it owns one `Collection` per
//! backend table, the timeline's `PhotoLoader`, the password record, and the
//! session flag, all sharing one remote store, one cache directory, and one
//! event sink. Consumers hold snapshots or watch receivers and go through
//! the façade for every mutation.

pub mod collection;
pub mod photos;

pub use collection::{Collection, Entity};
pub use photos::PhotoLoader;

use std::sync::Arc;

use anyhow::Result;

use crate::auth::{PasswordStore, Session};
use crate::cache::CacheStore;
use crate::config::Config;
use crate::logger::EventLog;
use crate::models::{Flower, Letter, TimelineEntry};
use crate::remote::{RemoteStore, RestClient};

pub struct MementoStore {
    pub timeline: Collection<TimelineEntry>,
    pub photos: PhotoLoader,
    pub letters: Collection<Letter>,
    pub flowers: Collection<Flower>,
    pub password: PasswordStore,
    pub session: Session,
    events: EventLog,
}

impl MementoStore {
    /// Build the store over any remote backend. Each collection's
    /// consumer-visible state is seeded from its cache snapshot, so views
    /// render immediately while the first refresh runs.
    pub fn new(remote: Arc<dyn RemoteStore>, cache: CacheStore) -> Self {
        let cache = Arc::new(cache);
        let events = EventLog::new(remote.clone());

        let timeline: Collection<TimelineEntry> =
            Collection::new(remote.clone(), cache.clone(), events.clone());
        let photos = PhotoLoader::new(
            timeline.clone(),
            remote.clone(),
            cache.clone(),
            events.clone(),
        );
        let letters = Collection::new(remote.clone(), cache.clone(), events.clone());
        let flowers = Collection::new(remote.clone(), cache.clone(), events.clone());
        let password = PasswordStore::new(remote, events.clone());
        let session = Session::new(cache);

        Self {
            timeline,
            photos,
            letters,
            flowers,
            password,
            session,
            events,
        }
    }

    /// Connect using configuration: REST backend plus the platform cache
    /// directory.
    pub fn connect(config: &Config) -> Result<Self> {
        let remote = Arc::new(RestClient::from_config(config)?);
        let cache = CacheStore::new(config.cache_dir()?)?;
        Ok(Self::new(remote, cache))
    }

    /// Flush any queued sink events now instead of waiting for the debounce.
    /// Useful at shutdown; failures are swallowed as always.
    pub async fn flush_events(&self) {
        self.events.flush().await;
    }
}
