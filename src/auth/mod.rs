//! Password gate support.
//!
//! This module provides:
//! - `PasswordStore`: the single-row password hash record in the backend
//!   settings table, hashed with argon2
//! - `Session`: the locally persisted "already unlocked" flag
//!
//! The gate itself (prompting, rendering) belongs to consumers; this layer
//! only stores, replaces, and verifies the hash.

pub mod password;
pub mod session;

pub use password::PasswordStore;
pub use session::Session;
