//! Product catalog routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use super::error_response;
use crate::state::AppState;

/// `GET /api/products`: every product, in catalog order.
pub async fn list_products(State(state): State<AppState>) -> Response {
    match &state.catalog {
        Some(catalog) => Json(catalog.products()).into_response(),
        None => error_response(StatusCode::INTERNAL_SERVER_ERROR, "Data not available"),
    }
}

/// `GET /api/products/{id}`: one product by row index.
///
/// Non-numeric and out-of-range ids are both 404.
pub async fn get_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let product = id
        .parse::<usize>()
        .ok()
        .and_then(|id| state.catalog.as_deref()?.get(id));

    match product {
        Some(product) => Json(product).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Product not found"),
    }
}

#[cfg(test)]
#[path = "products_test.rs"]
mod products_test;
