use super::*;
use crate::state::test_helpers;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::Request;
use axum::routing::get;
use serde_json::Value;
use tower::ServiceExt;

fn router(state: AppState) -> Router {
    Router::new().route("/api/resolve", get(resolve)).fallback(serve_page).with_state(state)
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
    (status, headers, body)
}

fn page(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

// =============================================================================
// request_session
// =============================================================================

#[test]
fn session_from_token_cookie() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, "theme=dark; token=abc".parse().unwrap());
    assert_eq!(request_session(&headers).token.as_deref(), Some("abc"));
}

#[test]
fn session_from_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Bearer xyz".parse().unwrap());
    assert_eq!(request_session(&headers).token.as_deref(), Some("xyz"));
}

#[test]
fn empty_cookie_falls_back_to_bearer() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, "token=".parse().unwrap());
    headers.insert(header::AUTHORIZATION, "Bearer xyz".parse().unwrap());
    assert_eq!(request_session(&headers).token.as_deref(), Some("xyz"));
}

#[test]
fn no_credentials_is_empty_session() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
    assert_eq!(request_session(&headers), Session::default());
}

// =============================================================================
// serve_page
// =============================================================================

#[tokio::test]
async fn protected_page_redirects_without_token() {
    let (status, headers, _) = send(test_helpers::test_app_state(), page("/recommendation")).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn protected_page_served_with_token_cookie() {
    let request = Request::get("/recommendation").header(header::COOKIE, "token=abc").body(Body::empty()).unwrap();
    let (status, _, body) = send(test_helpers::test_app_state(), request).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "recommendation");
}

#[tokio::test]
async fn public_page_without_shell_returns_resolution() {
    let (status, _, body) = send(test_helpers::test_app_state(), page("/product/5")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "product-details");
    assert_eq!(json["params"]["id"], "5");
}

#[tokio::test]
async fn public_page_serves_shell_when_configured() {
    let state = test_helpers::test_app_state().with_shell("<div id=\"app\"></div>");
    let (status, headers, body) = send(state, page("/about")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::CONTENT_TYPE).unwrap().to_str().unwrap().starts_with("text/html"));
    assert_eq!(body, b"<div id=\"app\"></div>");
}

#[tokio::test]
async fn unknown_page_is_not_found_view_with_404() {
    let state = test_helpers::test_app_state().with_shell("<div id=\"app\"></div>");
    let (status, _, body) = send(state, page("/nonexistent-path")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, b"<div id=\"app\"></div>");
}

#[tokio::test]
async fn unknown_api_path_is_json_error() {
    let state = test_helpers::test_app_state().with_shell("<div id=\"app\"></div>");
    let (status, _, body) = send(state, page("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Not found");
}

#[tokio::test]
async fn bare_api_prefix_is_json_error() {
    let (status, _, body) = send(test_helpers::test_app_state(), page("/api")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Not found");
}

#[tokio::test]
async fn api_lookalike_page_still_uses_route_table() {
    let (status, _, body) = send(test_helpers::test_app_state(), page("/apiary")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "not-found");
}

#[tokio::test]
async fn non_get_page_request_is_method_not_allowed() {
    let state = test_helpers::test_app_state().with_shell("<div id=\"app\"></div>");
    let request = Request::post("/about").body(Body::empty()).unwrap();
    let (status, headers, body) = send(state, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers.get(header::ALLOW).unwrap(), "GET, HEAD");
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "Method not allowed");
}

#[tokio::test]
async fn head_page_request_is_served() {
    let state = test_helpers::test_app_state().with_shell("<div id=\"app\"></div>");
    let request = Request::head("/about").body(Body::empty()).unwrap();
    let (status, _, _) = send(state, request).await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// resolve
// =============================================================================

#[tokio::test]
async fn resolve_reports_redirect() {
    let (status, _, body) = send(test_helpers::test_app_state(), page("/api/resolve?path=/recommendation")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "login");
    assert_eq!(json["redirected_from"], "/recommendation");
}

#[tokio::test]
async fn resolve_honors_bearer_token() {
    let request = Request::get("/api/resolve?path=/recommendation")
        .header(header::AUTHORIZATION, "Bearer abc")
        .body(Body::empty())
        .unwrap();
    let (_, _, body) = send(test_helpers::test_app_state(), request).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "recommendation");
    assert!(json.get("redirected_from").is_none());
}

#[tokio::test]
async fn resolve_unknown_path_is_not_found_view() {
    let (status, _, body) = send(test_helpers::test_app_state(), page("/api/resolve?path=/nonexistent-path")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["name"], "not-found");
}
