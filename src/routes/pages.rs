//! Front-end page routes guarded on the server.
//!
//! SYSTEM CONTEXT
//! ==============
//! Deep links into the SPA hit this fallback first. It runs the same route
//! table and guard as the client navigator, so a protected page redirects to
//! `/login` before any shell is served.
//!
//! The request session is the `token` cookie, or a bearer token. Presence is
//! all that is checked; there is no server-side credential store.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::error_response;
use crate::nav::resolve_location;
use crate::state::AppState;
use crate::stores::session::Session;
use crate::stores::storage::TOKEN_KEY;

/// Build the per-request session from cookie or `Authorization` header.
pub(crate) fn request_session(headers: &HeaderMap) -> Session {
    let jar = CookieJar::from_headers(headers);
    let token = jar
        .get(TOKEN_KEY)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .or_else(|| bearer_token(headers));
    Session::with_token(token)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

#[derive(Deserialize)]
pub struct ResolveQuery {
    path: String,
}

/// `GET /api/resolve?path=...`: route resolution for the requesting session.
pub async fn resolve(State(state): State<AppState>, headers: HeaderMap, Query(query): Query<ResolveQuery>) -> Response {
    let session = request_session(&headers);
    match resolve_location(&state.routes, &state.guard, &query.path, &session) {
        Ok(location) => Json(location).into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, &e.to_string()),
    }
}

/// Unbound paths under this prefix are API misses, never pages.
const API_PREFIX: &str = "/api";

fn is_api_path(path: &str) -> bool {
    path.strip_prefix(API_PREFIX).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Fallback for every path no other route claims.
///
/// Unknown `/api` paths get the JSON error body. Pages answer `GET` and
/// `HEAD` only.
pub async fn serve_page(State(state): State<AppState>, method: Method, headers: HeaderMap, uri: Uri) -> Response {
    if is_api_path(uri.path()) {
        return error_response(StatusCode::NOT_FOUND, "Not found");
    }
    if method != Method::GET && method != Method::HEAD {
        return (
            [(header::ALLOW, "GET, HEAD")],
            error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
        )
            .into_response();
    }

    let session = request_session(&headers);
    let location = match resolve_location(&state.routes, &state.guard, uri.path(), &session) {
        Ok(location) => location,
        Err(e) => {
            tracing::debug!(error = %e, path = %uri.path(), "no front-end route");
            return error_response(StatusCode::NOT_FOUND, "Not found");
        }
    };

    if let Some(from) = &location.redirected_from {
        tracing::info!(%from, to = %location.path, "redirecting unauthenticated page request");
        return Redirect::temporary(&location.path).into_response();
    }

    let status = if location.catch_all { StatusCode::NOT_FOUND } else { StatusCode::OK };
    match &state.shell {
        Some(html) => (status, Html(html.to_string())).into_response(),
        None => (status, Json(location)).into_response(),
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod pages_test;
