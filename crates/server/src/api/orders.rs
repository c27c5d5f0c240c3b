use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use jusku_core::delivery;
use jusku_core::domain::order::{
    DeliveryAddress, DetailedOrder, Order, OrderId, OrderStatus, RiderInfo,
};
use jusku_core::domain::product::ProductId;

use crate::checkout::{self, DraftItem, OrderDraft, ReorderOverrides};
use crate::state::AppState;

use super::{error_response, not_found, require_user, store_error, ErrorReply};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItem>,
    pub delivery_address: DeliveryAddress,
    pub delivery_lat: f64,
    pub delivery_lng: f64,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderItem {
    pub product_id: String,
    pub quantity_litres: Decimal,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

#[derive(Debug, Serialize)]
pub struct OrderReply {
    pub message: String,
    pub order: DetailedOrder,
}

#[derive(Debug, Serialize)]
pub struct OrderListReply {
    pub orders: Vec<Order>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct TrackReply {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub progress_pct: u8,
    pub status_message: &'static str,
    pub estimated_delivery_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining_minutes: Option<i64>,
    pub rider: RiderInfo,
}

#[derive(Debug, Serialize)]
pub struct CancelReply {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub delivery_address: Option<DeliveryAddress>,
    #[serde(default)]
    pub delivery_lat: Option<f64>,
    #[serde(default)]
    pub delivery_lng: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderReply>), ErrorReply> {
    let user_id = require_user(&headers)?;

    let draft = OrderDraft {
        user_id,
        items: request
            .items
            .into_iter()
            .map(|item| DraftItem {
                product_id: ProductId(item.product_id),
                quantity_litres: item.quantity_litres,
            })
            .collect(),
        delivery_address: request.delivery_address,
        delivery_lat: request.delivery_lat,
        delivery_lng: request.delivery_lng,
        payment_method: request.payment_method,
        notes: request.notes,
    };

    let mut rng = StdRng::from_entropy();
    let placed = checkout::place_order(&state, &mut rng, draft).await.map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(OrderReply {
            message: "Order created successfully".to_string(),
            order: DetailedOrder { order: placed.order, outlet: placed.outlet },
        }),
    ))
}

pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<OrderListReply>, ErrorReply> {
    let user_id = require_user(&headers)?;
    let orders = state.orders.list_for_user(&user_id).await.map_err(store_error)?;
    let total = orders.len();

    Ok(Json(OrderListReply { orders, total }))
}

pub async fn get_order(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DetailedOrder>, ErrorReply> {
    let detailed = state
        .orders
        .find_detailed(&OrderId(id))
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found("order"))?;

    Ok(Json(detailed))
}

pub async fn track_order(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TrackReply>, ErrorReply> {
    let order = state
        .orders
        .find_by_id(&OrderId(id))
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found("order"))?;

    let time_remaining_minutes = delivery::time_remaining_minutes(
        order.status,
        order.estimated_delivery_time,
        Utc::now(),
    );

    Ok(Json(TrackReply {
        order_id: order.id,
        status: order.status,
        progress_pct: order.status.progress_pct(),
        status_message: order.status.tracking_message(),
        estimated_delivery_time: order.estimated_delivery_time,
        time_remaining_minutes,
        rider: order.rider,
    }))
}

pub async fn cancel_order(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CancelReply>, ErrorReply> {
    let mut order = state
        .orders
        .find_by_id(&OrderId(id))
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found("order"))?;

    order
        .transition_to(OrderStatus::Cancelled)
        .map_err(|error| error_response(error.into()))?;
    state.orders.update_status(&order.id, order.status).await.map_err(store_error)?;

    tracing::info!(
        event_name = "order.cancelled",
        order_id = %order.id,
        "order cancelled by the customer"
    );

    Ok(Json(CancelReply {
        order_id: order.id,
        status: order.status,
        message: "Order cancelled".to_string(),
    }))
}

pub async fn reorder_order(
    Path(id): Path<String>,
    State(state): State<AppState>,
    request: Option<Json<ReorderRequest>>,
) -> Result<(StatusCode, Json<OrderReply>), ErrorReply> {
    let previous = state
        .orders
        .find_detailed(&OrderId(id))
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found("order"))?;

    let request = request.map(|Json(request)| request).unwrap_or_default();
    let overrides = ReorderOverrides {
        delivery_address: request.delivery_address,
        delivery_lat: request.delivery_lat,
        delivery_lng: request.delivery_lng,
        payment_method: request.payment_method,
    };

    let mut rng = StdRng::from_entropy();
    let placed = checkout::reorder(&state, &mut rng, &previous.order, overrides)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(OrderReply {
            message: "Order created from your previous order".to_string(),
            order: DetailedOrder { order: placed.order, outlet: placed.outlet },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use axum::Json;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use jusku_core::config::AppConfig;
    use jusku_core::domain::order::{
        DeliveryAddress, Order, OrderId, OrderItem, OrderStatus, RiderInfo,
    };
    use jusku_core::domain::outlet::{NearestOutlet, OutletId};
    use jusku_core::domain::product::{Product, ProductId};
    use jusku_db::repositories::{
        InMemoryOrderRepository, InMemoryOutletRepository, InMemoryProductRepository,
        InMemorySymptomMappingRepository, OrderRepository,
    };

    use crate::state::AppState;

    use super::{
        cancel_order, create_order, list_orders, track_order, CreateOrderItem,
        CreateOrderRequest,
    };

    struct Fixture {
        state: AppState,
        orders: Arc<InMemoryOrderRepository>,
    }

    async fn fixture() -> Fixture {
        let products = Arc::new(InMemoryProductRepository::default());
        products
            .insert(Product {
                id: ProductId("prod-citrus".to_string()),
                name: "Citrus Immunity".to_string(),
                price_per_litre: Decimal::new(18_000, 0),
                ingredients: vec!["Orange".to_string()],
                health_benefits: Vec::new(),
                allergens: Vec::new(),
                is_available: true,
            })
            .await;

        let outlets = Arc::new(InMemoryOutletRepository::with_nearest(NearestOutlet {
            outlet_id: OutletId("outlet-menteng".to_string()),
            name: "Jusku Menteng".to_string(),
            address: "Menteng".to_string(),
            distance_km: 1.0,
        }));
        let orders = Arc::new(InMemoryOrderRepository::default());

        let state = AppState::with_repositories(
            Arc::new(AppConfig::default()),
            products,
            outlets,
            Arc::new(InMemorySymptomMappingRepository::default()),
            orders.clone(),
        );

        Fixture { state, orders }
    }

    fn user_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("user-1"));
        headers
    }

    fn stored_order(status: OrderStatus) -> Order {
        Order {
            id: OrderId("order-1".to_string()),
            user_id: "user-1".to_string(),
            outlet_id: OutletId("outlet-menteng".to_string()),
            status,
            total_amount: Decimal::new(22_000, 0),
            delivery_fee: 4_000,
            estimated_delivery_time: Utc::now() + chrono::Duration::minutes(40),
            rider: RiderInfo {
                name: "Budi Santoso".to_string(),
                phone: "+62-812-5550-101".to_string(),
                vehicle_plate: "B 3401 KJU".to_string(),
            },
            delivery_address: DeliveryAddress {
                street: "Jl. Sabang 12".to_string(),
                city: "Jakarta".to_string(),
                district: "Menteng".to_string(),
            },
            delivery_lat: -6.19,
            delivery_lng: 106.83,
            payment_method: "cash".to_string(),
            notes: None,
            items: vec![OrderItem {
                product_id: ProductId("prod-citrus".to_string()),
                product_name: None,
                quantity_litres: Decimal::ONE,
                unit_price: Decimal::new(18_000, 0),
                subtotal: Decimal::new(18_000, 0),
            }],
            created_at: Utc::now(),
        }
    }

    fn create_request() -> CreateOrderRequest {
        CreateOrderRequest {
            items: vec![CreateOrderItem {
                product_id: "prod-citrus".to_string(),
                quantity_litres: Decimal::ONE,
            }],
            delivery_address: DeliveryAddress {
                street: "Jl. Sabang 12".to_string(),
                city: "Jakarta".to_string(),
                district: "Menteng".to_string(),
            },
            delivery_lat: -6.19,
            delivery_lng: 106.83,
            payment_method: "cash".to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn creates_an_order_for_the_header_user() {
        let fixture = fixture().await;

        let (status, Json(reply)) =
            create_order(State(fixture.state.clone()), user_headers(), Json(create_request()))
                .await
                .expect("created");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(reply.order.order.user_id, "user-1");
        // 18000 + fee 2000 + 2000 * ceil(1.0).
        assert_eq!(reply.order.order.total_amount, Decimal::new(22_000, 0));

        let Json(listing) =
            list_orders(State(fixture.state), user_headers()).await.expect("list");
        assert_eq!(listing.total, 1);
    }

    #[tokio::test]
    async fn missing_user_header_is_rejected() {
        let fixture = fixture().await;

        let error =
            create_order(State(fixture.state), HeaderMap::new(), Json(create_request()))
                .await
                .expect_err("must fail");
        assert_eq!(error.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tracking_reports_progress_and_remaining_time() {
        let fixture = fixture().await;
        fixture.orders.insert_header(&stored_order(OrderStatus::Preparing)).await.expect("seed");

        let Json(track) =
            track_order(Path("order-1".to_string()), State(fixture.state)).await.expect("track");

        assert_eq!(track.progress_pct, 50);
        assert_eq!(track.status_message, "Your juices are being pressed fresh");
        let remaining = track.time_remaining_minutes.expect("non-terminal order");
        assert!((39..=40).contains(&remaining), "got {remaining}");
    }

    #[tokio::test]
    async fn tracking_a_cancelled_order_has_no_remaining_time() {
        let fixture = fixture().await;
        fixture.orders.insert_header(&stored_order(OrderStatus::Cancelled)).await.expect("seed");

        let Json(track) =
            track_order(Path("order-1".to_string()), State(fixture.state)).await.expect("track");

        assert_eq!(track.progress_pct, 0);
        assert!(track.time_remaining_minutes.is_none());
    }

    #[tokio::test]
    async fn cancel_succeeds_from_pending() {
        let fixture = fixture().await;
        fixture.orders.insert_header(&stored_order(OrderStatus::Pending)).await.expect("seed");

        let Json(reply) = cancel_order(Path("order-1".to_string()), State(fixture.state.clone()))
            .await
            .expect("cancelled");

        assert_eq!(reply.status, OrderStatus::Cancelled);
        let stored = fixture
            .orders
            .find_by_id(&OrderId("order-1".to_string()))
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_conflicts_once_preparing() {
        let fixture = fixture().await;
        fixture.orders.insert_header(&stored_order(OrderStatus::Preparing)).await.expect("seed");

        let error = cancel_order(Path("order-1".to_string()), State(fixture.state.clone()))
            .await
            .expect_err("must conflict");
        assert_eq!(error.0, StatusCode::CONFLICT);

        let stored = fixture
            .orders
            .find_by_id(&OrderId("order-1".to_string()))
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.status, OrderStatus::Preparing, "status must be unchanged");
    }

    #[tokio::test]
    async fn unknown_order_is_a_404() {
        let fixture = fixture().await;
        let error = track_order(Path("order-nope".to_string()), State(fixture.state))
            .await
            .expect_err("must 404");
        assert_eq!(error.0, StatusCode::NOT_FOUND);
    }
}
