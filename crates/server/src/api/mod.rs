//! JSON API routes.
//!
//! - `POST /api/v1/recommendations`       — symptom-based product picks
//! - `GET  /api/v1/products`              — available catalog
//! - `GET  /api/v1/products/{id}`         — single product
//! - `GET  /api/v1/delivery/fee`          — fee quote for a coordinate
//! - `POST /api/v1/orders`                — place an order
//! - `GET  /api/v1/orders`                — caller's orders
//! - `GET  /api/v1/orders/{id}`           — order detail
//! - `GET  /api/v1/orders/{id}/track`     — tracking snapshot
//! - `POST /api/v1/orders/{id}/cancel`    — guarded cancellation
//! - `POST /api/v1/orders/{id}/reorder`   — repeat a previous order

pub mod catalog;
pub mod delivery;
pub mod orders;
pub mod recommendations;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use jusku_core::errors::{ApplicationError, DomainError};
use jusku_db::repositories::RepositoryError;

use crate::state::AppState;

/// Upstream identity service hands the verified subject to this backend in
/// a header; token verification itself happens before requests reach us.
pub const USER_HEADER: &str = "x-user-id";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/products", get(catalog::list_products))
        .route("/products/{id}", get(catalog::get_product))
        .route("/recommendations", post(recommendations::recommend))
        .route("/delivery/fee", get(delivery::fee_quote))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/track", get(orders::track_order))
        .route("/orders/{id}/cancel", post(orders::cancel_order))
        .route("/orders/{id}/reorder", post(orders::reorder_order))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: &'static str,
}

pub type ErrorReply = (StatusCode, Json<ApiError>);

pub fn error_response(error: ApplicationError) -> ErrorReply {
    let (status, code) = match &error {
        ApplicationError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        ApplicationError::NoOutletAvailable => {
            (StatusCode::UNPROCESSABLE_ENTITY, "no_outlet_available")
        }
        ApplicationError::ProductUnavailable(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "product_unavailable")
        }
        ApplicationError::Domain(DomainError::InvalidOrderTransition { .. }) => {
            (StatusCode::CONFLICT, "invalid_state_transition")
        }
        ApplicationError::Domain(DomainError::InvariantViolation(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "invariant_violation")
        }
        ApplicationError::OrderCreationFailed(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "order_creation_failed")
        }
        ApplicationError::OrderItemsCreationFailed(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "order_items_creation_failed")
        }
        ApplicationError::StoreUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
        }
    };

    (status, Json(ApiError { error: error.to_string(), code }))
}

pub fn store_error(error: RepositoryError) -> ErrorReply {
    error_response(ApplicationError::StoreUnavailable(error.to_string()))
}

pub fn not_found(what: &str) -> ErrorReply {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError { error: format!("{what} not found"), code: "not_found" }),
    )
}

pub fn require_user(headers: &HeaderMap) -> Result<String, ErrorReply> {
    headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            error_response(ApplicationError::InvalidInput(format!(
                "missing `{USER_HEADER}` header"
            )))
        })
}
