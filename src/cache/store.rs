use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Subdirectory holding individual photo payloads
const BLOB_DIR: &str = "photos";

pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        fs::create_dir_all(root.join(BLOB_DIR))?;
        Ok(Self { root })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize(key)))
    }

    /// Read and decode a snapshot. A missing file, an unreadable file, and
    /// corrupt JSON all read as absent - a broken cache entry must never
    /// surface as an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let contents = fs::read_to_string(self.entry_path(key)).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(key, error = %e, "Discarding corrupt cache entry");
                None
            }
        }
    }

    /// Encode and write a snapshot. Best-effort: failures are logged and
    /// swallowed so callers never block on the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let contents = match serde_json::to_string(value) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(key, error = %e, "Failed to encode cache entry");
                return;
            }
        };
        if let Err(e) = fs::write(self.entry_path(key), contents) {
            debug!(key, error = %e, "Failed to write cache entry");
        }
    }

    pub fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.entry_path(key));
    }

    // ===== Flags =====

    pub fn get_flag(&self, key: &str) -> bool {
        self.get::<bool>(key).unwrap_or(false)
    }

    pub fn set_flag(&self, key: &str, value: bool) {
        self.set(key, &value);
    }

    // ===== Photo blobs =====

    fn blob_path(&self, id: &str) -> PathBuf {
        self.root.join(BLOB_DIR).join(sanitize(id))
    }

    pub fn get_blob(&self, id: &str) -> Option<String> {
        fs::read_to_string(self.blob_path(id)).ok()
    }

    /// Best-effort, like `set`. Blobs are keyed by entry id and never
    /// invalidated within a session.
    pub fn put_blob(&self, id: &str, payload: &str) {
        if let Err(e) = fs::write(self.blob_path(id), payload) {
            debug!(id, error = %e, "Failed to write photo blob");
        }
    }
}

/// Cache file names must stay inside the cache directory; ids are generated
/// as base36 but the cache does not trust its callers with path components.
/// Non-safe bytes are hex-escaped rather than replaced, so distinct keys
/// never share a file. `_` is the escape marker and gets escaped itself.
fn sanitize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' => out.push(byte as char),
            other => {
                out.push('_');
                out.push_str(&format!("{:02x}", other));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, CacheStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (_dir, store) = store();
        store.set("timeline", &vec!["a".to_string(), "b".to_string()]);
        let back: Option<Vec<String>> = store.get("timeline");
        assert_eq!(back, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let (_dir, store) = store();
        assert_eq!(store.get::<Vec<String>>("letters"), None);
    }

    #[test]
    fn test_corrupt_entry_is_absent() {
        let (dir, store) = store();
        fs::write(dir.path().join("letters.json"), "{not json").unwrap();
        assert_eq!(store.get::<Vec<String>>("letters"), None);
    }

    #[test]
    fn test_blob_round_trip() {
        let (_dir, store) = store();
        assert_eq!(store.get_blob("t1"), None);
        store.put_blob("t1", "data:image/png;base64,AAAA");
        assert_eq!(
            store.get_blob("t1").as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[test]
    fn test_flag_round_trip() {
        let (_dir, store) = store();
        assert!(!store.get_flag("authenticated"));
        store.set_flag("authenticated", true);
        assert!(store.get_flag("authenticated"));
        store.remove("authenticated");
        assert!(!store.get_flag("authenticated"));
    }

    #[test]
    fn test_hostile_key_stays_in_cache_dir() {
        let (dir, store) = store();
        store.put_blob("../../escape", "payload");
        assert!(!dir.path().parent().unwrap().join("escape").exists());
        // Sanitized name still round-trips
        assert_eq!(store.get_blob("../../escape").as_deref(), Some("payload"));
    }

    #[test]
    fn test_keys_differing_only_in_escaped_chars_stay_distinct() {
        let (_dir, store) = store();
        store.put_blob("a.b", "dot");
        store.put_blob("a_b", "underscore");
        store.put_blob("a/b", "slash");
        assert_eq!(store.get_blob("a.b").as_deref(), Some("dot"));
        assert_eq!(store.get_blob("a_b").as_deref(), Some("underscore"));
        assert_eq!(store.get_blob("a/b").as_deref(), Some("slash"));
    }
}
