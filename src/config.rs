//! Backend endpoint and cache location configuration.
//!
//! The backend URL and anon key come from the environment (a `.env` file is
//! honored if present). The cache defaults to the platform cache directory
//! but can be pinned explicitly, which embedders and tests use.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application name used for cache directory paths
const APP_NAME: &str = "keepsake";

/// Environment variable naming the backend project URL
const URL_VAR: &str = "KEEPSAKE_BACKEND_URL";

/// Environment variable naming the backend anon key
const KEY_VAR: &str = "KEEPSAKE_BACKEND_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend, e.g. `https://project.supabase.co`
    pub base_url: String,
    /// Anon API key sent with every request
    pub api_key: String,
    /// Explicit cache root; `None` uses the platform cache directory
    pub cache_root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let base_url =
            std::env::var(URL_VAR).with_context(|| format!("{} is not set", URL_VAR))?;
        let api_key = std::env::var(KEY_VAR).with_context(|| format!("{} is not set", KEY_VAR))?;

        Ok(Self {
            base_url,
            api_key,
            cache_root: None,
        })
    }

    /// Directory holding collection snapshots and the photo blob store.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref root) = self.cache_root {
            return Ok(root.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
