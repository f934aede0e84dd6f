use std::sync::Arc;

use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::{json, Value};
use tracing::warn;

use crate::logger::EventLog;
use crate::remote::{RemoteError, RemoteStore, SelectQuery};
use crate::utils::generate_id;

/// Backend table holding the single settings row
const SETTINGS_TABLE: &str = "app_settings";

/// The password hash record.
pub struct PasswordStore {
    remote: Arc<dyn RemoteStore>,
    events: EventLog,
}

impl PasswordStore {
    pub(crate) fn new(remote: Arc<dyn RemoteStore>, events: EventLog) -> Self {
        Self { remote, events }
    }

    /// Fetch the stored hash, if a password has been configured.
    pub async fn get_hash(&self) -> Result<Option<String>> {
        match self
            .remote
            .select(SETTINGS_TABLE, SelectQuery::all().columns("id,password_hash"))
            .await
        {
            Ok(rows) => {
                self.events.info("settings.get", None, None);
                Ok(rows
                    .first()
                    .and_then(|row| row.get("password_hash"))
                    .and_then(Value::as_str)
                    .map(String::from))
            }
            Err(e) => {
                self.events.error(
                    "settings.get",
                    Some(&e.to_string()),
                    Some(json!({"code": e.code()})),
                );
                Err(e.into())
            }
        }
    }

    /// Replace the stored password.
    ///
    /// The swap is delete-all-then-insert, not an upsert: a failure between
    /// the two steps leaves no password recorded until the next successful
    /// call, and concurrent readers can observe the empty window.
    pub async fn set_password(&self, password: &str) -> Result<()> {
        let hash = hash_password(password)?;

        let outcome: Result<(), RemoteError> = async {
            let rows = self
                .remote
                .select(SETTINGS_TABLE, SelectQuery::all().columns("id"))
                .await?;
            for row in &rows {
                if let Some(id) = row.get("id").and_then(Value::as_str) {
                    self.remote.delete(SETTINGS_TABLE, id).await?;
                }
            }
            let row = json!({"id": generate_id(), "password_hash": hash});
            self.remote.insert(SETTINGS_TABLE, vec![row]).await?;
            Ok(())
        }
        .await;

        match outcome {
            Ok(()) => {
                self.events.info("settings.set", None, None);
                Ok(())
            }
            Err(e) => {
                self.events.error(
                    "settings.set",
                    Some(&e.to_string()),
                    Some(json!({"code": e.code()})),
                );
                Err(e.into())
            }
        }
    }

    /// Check a candidate password. An unconfigured password never matches.
    pub async fn verify(&self, password: &str) -> Result<bool> {
        match self.get_hash().await? {
            Some(stored) => Ok(verify_password(password, &stored)),
            None => Ok(false),
        }
    }
}

/// Argon2id PHC-format hash of a gate password.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!(error = %e, "Stored password hash is not parseable");
            false
        }
    }
}
