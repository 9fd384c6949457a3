//! Async navigator driving route resolution through the guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! The navigator is the client-side entry point: it holds the shared session
//! store and awaits it before the guard runs. The server's page fallback uses
//! `resolve_location` directly with a per-request session.

#[cfg(test)]
#[path = "navigator_test.rs"]
mod navigator_test;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use super::guard::{GuardDecision, NavigationGuard, SessionView};
use super::route::{RouteMatch, RouteTable};
use crate::stores::session::SessionStore;
use crate::stores::storage::KeyValueStorage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no route matches `{0}`")]
    NoMatch(String),
}

/// A fully resolved navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub name: String,
    pub view: String,
    pub path: String,
    pub params: BTreeMap<String, String>,
    pub requires_auth: bool,
    /// Original path when the guard redirected this navigation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
    #[serde(skip)]
    pub catch_all: bool,
}

impl Location {
    fn from_match(m: &RouteMatch<'_>, redirected_from: Option<String>) -> Self {
        Self {
            name: m.leaf.name.clone(),
            view: m.leaf.view.clone(),
            path: m.path.clone(),
            params: m.params.clone(),
            requires_auth: m.requires_auth(),
            redirected_from,
            catch_all: m.catch_all,
        }
    }
}

/// Resolve `path` against `table`, applying `guard` for `session`.
///
/// Follows at most one redirect. The guard never redirects away from the
/// login path, so the redirect target needs no second check.
///
/// # Errors
///
/// Returns `NoMatch` when the path (or the login redirect target) matches no
/// route.
pub fn resolve_location<S>(
    table: &RouteTable,
    guard: &NavigationGuard,
    path: &str,
    session: &S,
) -> Result<Location, NavigationError>
where
    S: SessionView + ?Sized,
{
    let target = table.resolve(path).ok_or_else(|| NavigationError::NoMatch(path.to_owned()))?;

    match guard.before_each(&target, session) {
        GuardDecision::Proceed => Ok(Location::from_match(&target, None)),
        GuardDecision::Redirect(to) => {
            let redirected = table.resolve(&to).ok_or(NavigationError::NoMatch(to))?;
            Ok(Location::from_match(&redirected, Some(target.path)))
        }
    }
}

/// Client-side navigator over a shared session store.
pub struct Navigator<S> {
    table: Arc<RouteTable>,
    guard: NavigationGuard,
    session: Arc<RwLock<SessionStore<S>>>,
    current: Option<Location>,
}

impl<S: KeyValueStorage> Navigator<S> {
    #[must_use]
    pub fn new(table: Arc<RouteTable>, guard: NavigationGuard, session: Arc<RwLock<SessionStore<S>>>) -> Self {
        Self { table, guard, session, current: None }
    }

    /// Navigate to `path`. The current location only changes on success.
    ///
    /// # Errors
    ///
    /// See [`resolve_location`].
    pub async fn push(&mut self, path: &str) -> Result<Location, NavigationError> {
        let location = {
            let session = self.session.read().await;
            resolve_location(&self.table, &self.guard, path, &*session)?
        };

        if let Some(from) = &location.redirected_from {
            tracing::info!(from = %from, to = %location.path, "navigation redirected to login");
        } else {
            tracing::debug!(path = %location.path, route = %location.name, "navigation resolved");
        }

        self.current = Some(location.clone());
        Ok(location)
    }

    #[must_use]
    pub fn current(&self) -> Option<&Location> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> &Arc<RwLock<SessionStore<S>>> {
        &self.session
    }
}
