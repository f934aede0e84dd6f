//! Keepsake - cache-first data layer for a password-gated memento app.
//!
//! The crate mediates between view consumers, a hosted Postgres backend, and
//! a local cache. It provides:
//!
//! - `MementoStore`: the composition root holding one façade per collection
//!   (timeline entries, letters, flowers) plus the password record and the
//!   session flag
//! - `Collection`: cache-first reads with refresh, optimistic mutations with
//!   rollback-by-resync
//! - `PhotoLoader`: deferred, cached fetching of timeline photo payloads
//! - `EventLog`: a best-effort batched sink for remote append-only logging
//!
//! Collection operations never surface backend errors: reads degrade to the
//! last cached snapshot and failed writes resynchronize from the remote.

pub mod auth;
pub mod cache;
pub mod config;
pub mod logger;
pub mod models;
pub mod remote;
pub mod store;
pub mod utils;

pub use auth::{PasswordStore, Session};
pub use cache::CacheStore;
pub use config::Config;
pub use logger::{EventLog, LogLevel};
pub use models::{Flower, FlowerKind, Letter, TimelineEntry};
pub use remote::{Direction, RemoteError, RemoteStore, RestClient, SelectQuery};
pub use store::{Collection, Entity, MementoStore, PhotoLoader};
