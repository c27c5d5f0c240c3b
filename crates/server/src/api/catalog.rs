use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use jusku_core::domain::product::{Product, ProductId};

use crate::state::AppState;

use super::{not_found, store_error, ErrorReply};

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: usize,
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, ErrorReply> {
    let products = state.products.list_available().await.map_err(store_error)?;
    let total = products.len();

    Ok(Json(ProductListResponse { products, total }))
}

pub async fn get_product(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Product>, ErrorReply> {
    let product = state
        .products
        .find_available_by_id(&ProductId(id))
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found("product"))?;

    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use rust_decimal::Decimal;

    use jusku_core::config::AppConfig;
    use jusku_core::domain::product::{Product, ProductId};
    use jusku_db::repositories::{
        InMemoryOrderRepository, InMemoryOutletRepository, InMemoryProductRepository,
        InMemorySymptomMappingRepository,
    };

    use crate::state::AppState;

    use super::{get_product, list_products};

    async fn state() -> AppState {
        let products = Arc::new(InMemoryProductRepository::default());
        products
            .insert(Product {
                id: ProductId("prod-citrus".to_string()),
                name: "Citrus Immunity".to_string(),
                price_per_litre: Decimal::new(22_000, 0),
                ingredients: vec!["Orange".to_string()],
                health_benefits: vec!["Boosts immunity".to_string()],
                allergens: Vec::new(),
                is_available: true,
            })
            .await;

        AppState::with_repositories(
            Arc::new(AppConfig::default()),
            products,
            Arc::new(InMemoryOutletRepository::default()),
            Arc::new(InMemorySymptomMappingRepository::default()),
            Arc::new(InMemoryOrderRepository::default()),
        )
    }

    #[tokio::test]
    async fn lists_the_available_catalog() {
        let response = list_products(State(state().await)).await.expect("list");
        assert_eq!(response.0.total, 1);
        assert_eq!(response.0.products[0].name, "Citrus Immunity");
    }

    #[tokio::test]
    async fn unknown_product_is_a_404() {
        let error = get_product(Path("prod-nope".to_string()), State(state().await))
            .await
            .expect_err("must 404");
        assert_eq!(error.0, StatusCode::NOT_FOUND);
    }
}
