//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the catalog API and the route-resolution API, then hands every other
//! path to the page fallback, which applies the front-end route table and
//! auth guard before serving the SPA shell.

pub mod pages;
pub mod products;

use axum::Router;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router = Router::new()
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/hello", get(hello))
        .route("/api/resolve", get(pages::resolve))
        .route("/healthz", get(healthz))
        .fallback(pages::serve_page);

    let router = match &config.dist_dir {
        Some(dir) => router.nest_service("/assets", ServeDir::new(dir.join("assets"))),
        None => router,
    };

    router
        .layer(cors_layer(&config.cors_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// `{"error": message}` with the given status.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn hello() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello from the cosmetics catalog!" }))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
