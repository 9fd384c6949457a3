//! Auth-session store for the current user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Consulted by the navigation guard and by identity-aware consumers. The
//! token survives restarts through `KeyValueStorage`; the user record does
//! not and is re-set after login.
//!
//! Observers register through `subscribe` and receive every mutation.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::storage::{KeyValueStorage, StorageError, TOKEN_KEY};
use crate::nav::guard::SessionView;

/// Profile returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
}

/// Snapshot of session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<UserRecord>,
    pub token: Option<String>,
}

impl Session {
    /// Session carrying only a token; empty tokens are treated as absent.
    #[must_use]
    pub fn with_token(token: Option<String>) -> Self {
        Self { user: None, token: token.filter(|t| !t.is_empty()) }
    }
}

impl SessionView for Session {
    fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

pub struct SessionStore<S> {
    storage: S,
    state: watch::Sender<Session>,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// Create the store, restoring the token from `storage` if present.
    #[must_use]
    pub fn new(storage: S) -> Self {
        let session = Session::with_token(storage.get_item(TOKEN_KEY));
        if session.token.is_some() {
            tracing::debug!("restored session token from storage");
        }
        let (state, _) = watch::channel(session);
        Self { storage, state }
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserRecord> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Persist `token` and make it the current session token. An empty token
    /// is persisted as given but held in memory as absent, the same as a
    /// restore of that stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the token could not be persisted; the in-memory
    /// session is left unchanged in that case.
    pub fn set_token(&mut self, token: impl Into<String>) -> Result<(), StorageError> {
        let token = token.into();
        self.storage.set_item(TOKEN_KEY, &token)?;
        let restored = Session::with_token(Some(token)).token;
        self.state.send_modify(|s| s.token = restored);
        Ok(())
    }

    pub fn set_user(&mut self, user: Option<UserRecord>) {
        self.state.send_modify(|s| s.user = user);
    }

    /// Clear user and token, in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored token could not be removed; the
    /// in-memory session is left unchanged in that case.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.storage.remove_item(TOKEN_KEY)?;
        self.state.send_modify(|s| *s = Session::default());
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Register an observer. The receiver starts at the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S: KeyValueStorage> SessionView for SessionStore<S> {
    fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }
}
