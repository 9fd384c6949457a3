//! Auth navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs before every navigation, on the client-side navigator and on the
//! server's page fallback alike, so both apply identical unauthenticated
//! redirect behavior.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use serde::Serialize;

use super::route::{LOGIN_PATH, RouteMatch, normalize_path};

/// Read-only view of whether the current user holds a session.
pub trait SessionView {
    fn is_authenticated(&self) -> bool;
}

/// Outcome of running the guard for one navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "to", rename_all = "snake_case")]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationGuard {
    login_path: String,
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(LOGIN_PATH)
    }
}

impl NavigationGuard {
    #[must_use]
    pub fn new(login_path: &str) -> Self {
        Self { login_path: normalize_path(login_path) }
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide whether navigation to `to` may proceed for `session`.
    ///
    /// Never mutates the session. Navigating to the login path itself always
    /// proceeds.
    pub fn before_each<S>(&self, to: &RouteMatch<'_>, session: &S) -> GuardDecision
    where
        S: SessionView + ?Sized,
    {
        if !to.requires_auth() || session.is_authenticated() {
            return GuardDecision::Proceed;
        }
        if to.path.eq_ignore_ascii_case(&self.login_path) {
            return GuardDecision::Proceed;
        }
        tracing::debug!(path = %to.path, route = %to.leaf.name, "unauthenticated navigation to protected route");
        GuardDecision::Redirect(self.login_path.clone())
    }
}
