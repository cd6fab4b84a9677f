//! Session Store: durable persistence of the token and profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! Browser builds back this with `localStorage`, the terminal client with a
//! JSON file, tests with [`MemoryStorage`]. The key layout (`token` plus a
//! JSON `user` profile) is shared by all of them.
//!
//! TRADE-OFFS
//! ==========
//! Anything unreadable loads as "no session". A corrupt blob can only ever
//! log the user out, never in.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use crate::session::{Session, UserProfile};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the JSON-encoded [`UserProfile`].
pub const PROFILE_KEY: &str = "user";

/// Error raised by a durable storage backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The backing store does not exist in this environment.
    #[error("session storage unavailable")]
    Unavailable,
    /// The backend refused the write (quota, permissions, I/O).
    #[error("session storage write failed: {0}")]
    Write(String),
}

/// String key/value durable storage, modelled on the browser `Storage` API.
pub trait SessionStorage {
    /// Read a value. Unreadable values are reported as absent.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot persist the value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the value may still be on durable storage.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage for tests and non-browser builds.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects every write, like a browser with storage disabled.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            items: HashMap::new(),
            read_only: true,
        }
    }

    /// Seed a raw value without going through the store.
    #[must_use]
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_owned(), value.to_owned());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Write(format!("{key} is read-only")));
        }
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.read_only && self.items.contains_key(key) {
            return Err(StorageError::Write(format!("{key} is read-only")));
        }
        self.items.remove(key);
        Ok(())
    }
}

/// Reads and writes the persisted session through a [`SessionStorage`].
#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the persisted session.
    ///
    /// Returns `None` when either key is missing, the token is blank, or the
    /// profile fails to decode. Partial or corrupt entries are purged.
    pub fn load(&mut self) -> Option<Session> {
        let token = self.storage.get_item(TOKEN_KEY);
        let profile = self.storage.get_item(PROFILE_KEY);
        if token.is_none() && profile.is_none() {
            return None;
        }

        let session = decode_session(token.as_deref(), profile.as_deref());
        if session.is_none() {
            // A failed purge still loads as logged out.
            let _ = self.clear();
        }
        session
    }

    /// Persist both halves of the session.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if either write fails. Whatever was persisted
    /// before the call, including an earlier session, is put back.
    pub fn save(&mut self, session: &Session) -> Result<(), StorageError> {
        let profile = serde_json::to_string(&session.profile())
            .map_err(|err| StorageError::Write(err.to_string()))?;

        let previous = [
            (TOKEN_KEY, self.storage.get_item(TOKEN_KEY)),
            (PROFILE_KEY, self.storage.get_item(PROFILE_KEY)),
        ];
        let written = self
            .storage
            .set_item(TOKEN_KEY, &session.token)
            .and_then(|()| self.storage.set_item(PROFILE_KEY, &profile));
        if written.is_err() {
            self.restore(&previous);
        }
        written
    }

    /// Remove both keys. Idempotent.
    ///
    /// Both removals are attempted even if the first fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] hit; the session may still be on
    /// durable storage.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let token = self.storage.remove_item(TOKEN_KEY);
        let profile = self.storage.remove_item(PROFILE_KEY);
        token.and(profile)
    }

    // Best effort: the failed save's own error is what callers see.
    fn restore(&mut self, previous: &[(&str, Option<String>)]) {
        for (key, value) in previous {
            if self.storage.get_item(key) == *value {
                continue;
            }
            let _ = match value {
                Some(value) => self.storage.set_item(key, value),
                None => self.storage.remove_item(key),
            };
        }
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn decode_session(token: Option<&str>, profile: Option<&str>) -> Option<Session> {
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }
    let profile: UserProfile = serde_json::from_str(profile?).ok()?;
    if profile.email.trim().is_empty() {
        return None;
    }
    Some(Session {
        token: token.to_owned(),
        role: profile.role,
        identity: profile.email,
    })
}
