//! Local cache for offline-tolerant reads.
//!
//! Two namespaces share one cache directory:
//!
//! - collection snapshots, one JSON file per key, overwritten wholesale on
//!   every successful remote list
//! - photo blobs, one file per entry id, append-only within a session
//!
//! The cache is strictly best-effort: reads treat missing or corrupt entries
//! as absent and writes swallow I/O failures, so no caller ever fails on a
//! cache problem.

pub mod store;

pub use store::CacheStore;
