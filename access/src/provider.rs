//! Auth Provider: the single owner of the current session.
//!
//! DESIGN
//! ======
//! Two mutators (`login`/`establish` and `logout`) funnel every change; all
//! other readers take [`AuthSnapshot`] copies. `loading` stays `true` until
//! the one-time [`AuthProvider::hydrate`] read completes, which keeps the
//! route guard from redirecting before persisted state is known.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::future::Future;

use crate::api::{ApiError, Credentials, LoginResponse};
use crate::session::Session;
use crate::store::{SessionStorage, SessionStore, StorageError};

/// External authentication endpoint.
pub trait AuthBackend {
    /// Exchange credentials for a token and role.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>>;
}

/// Why a login did not produce a session. State is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message suitable for an inline notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Storage(_) => "Unable to save your session in this browser.".to_owned(),
        }
    }
}

/// Read-only copy of auth state handed to consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub loading: bool,
    pub session: Option<Session>,
}

/// Process-wide session owner.
#[derive(Clone, Debug)]
pub struct AuthProvider<S> {
    store: SessionStore<S>,
    session: Option<Session>,
    loading: bool,
}

impl<S: SessionStorage> AuthProvider<S> {
    /// A provider that has not read persisted storage yet.
    pub fn new(storage: S) -> Self {
        Self {
            store: SessionStore::new(storage),
            session: None,
            loading: true,
        }
    }

    /// Read persisted storage once. Later calls return the in-memory session.
    pub fn hydrate(&mut self) -> Option<&Session> {
        if self.loading {
            self.session = self.store.load();
            self.loading = false;
        }
        self.session.as_ref()
    }

    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// `true` until the startup read completes.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            loading: self.loading,
            session: self.session.clone(),
        }
    }

    /// Adopt a successful login response: persist it, then publish it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the response is malformed or cannot be
    /// persisted; the previous state is kept.
    pub fn establish(&mut self, response: LoginResponse) -> Result<Session, AuthError> {
        let session = response.into_session()?;
        self.store.save(&session)?;
        self.session = Some(session.clone());
        self.loading = false;
        Ok(session)
    }

    /// Authenticate against `backend` and adopt the result.
    ///
    /// # Errors
    ///
    /// Surfaces the backend's [`ApiError`] or a persistence failure; the
    /// previous state is kept.
    pub async fn login<B: AuthBackend + ?Sized>(
        &mut self,
        backend: &B,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let response = backend.login(credentials).await?;
        self.establish(response)
    }

    /// Drop the session from memory and storage. Idempotent.
    ///
    /// The in-memory session is dropped unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the persisted copy could not be removed,
    /// so a later hydrate may restore it.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.session = None;
        self.loading = false;
        self.store.clear()
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }
}
