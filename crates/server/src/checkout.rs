//! Order pricing and assembly pipeline.
//!
//! A strictly sequential chain of store calls: resolve the nearest outlet,
//! price the line items against the current catalog, persist the header and
//! then the items. The store offers no multi-row atomicity here, so the
//! pipeline compensates explicitly: an item-write failure deletes the
//! already-written header before the error surfaces. Store failures are not
//! retried; they surface immediately.

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;

use jusku_core::delivery;
use jusku_core::domain::order::{
    assign_demo_rider, DeliveryAddress, Order, OrderId, OrderItem, OrderStatus,
};
use jusku_core::domain::outlet::OutletSummary;
use jusku_core::domain::product::ProductId;
use jusku_core::errors::ApplicationError;
use jusku_db::repositories::RepositoryError;

use crate::state::AppState;

const MAX_QUANTITY_LITRES: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

#[derive(Clone, Debug)]
pub struct OrderDraft {
    pub user_id: String,
    pub items: Vec<DraftItem>,
    pub delivery_address: DeliveryAddress,
    pub delivery_lat: f64,
    pub delivery_lng: f64,
    pub payment_method: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct DraftItem {
    pub product_id: ProductId,
    pub quantity_litres: Decimal,
}

/// Assembled order plus best-effort enrichment context.
#[derive(Clone, Debug)]
pub struct PlacedOrder {
    pub order: Order,
    pub outlet: Option<OutletSummary>,
    pub distance_km: f64,
}

/// Caller-supplied overrides when re-running a previous order.
#[derive(Clone, Debug, Default)]
pub struct ReorderOverrides {
    pub delivery_address: Option<DeliveryAddress>,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,
    pub payment_method: Option<String>,
}

pub async fn place_order<R: Rng + ?Sized>(
    state: &AppState,
    rng: &mut R,
    draft: OrderDraft,
) -> Result<PlacedOrder, ApplicationError> {
    validate_draft(&draft)?;

    let nearest = state
        .outlets
        .nearest_active(draft.delivery_lat, draft.delivery_lng)
        .await
        .map_err(store_error)?
        .ok_or(ApplicationError::NoOutletAvailable)?;

    let delivery_config = &state.config.delivery;
    let delivery_fee = delivery::delivery_fee(delivery_config, nearest.distance_km);
    let now = Utc::now();
    let estimated_delivery_time =
        delivery::estimated_delivery_time(delivery_config, now, nearest.distance_km);

    let mut items = Vec::with_capacity(draft.items.len());
    let mut total_amount = Decimal::ZERO;
    for line in &draft.items {
        let product = state
            .products
            .find_available_by_id(&line.product_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| ApplicationError::ProductUnavailable(line.product_id.0.clone()))?;

        let subtotal = product.price_per_litre * line.quantity_litres;
        total_amount += subtotal;
        items.push(OrderItem {
            product_id: product.id,
            product_name: Some(product.name),
            quantity_litres: line.quantity_litres,
            unit_price: product.price_per_litre,
            subtotal,
        });
    }
    total_amount += Decimal::from(delivery_fee);

    let order = Order {
        id: OrderId::new(),
        user_id: draft.user_id,
        outlet_id: nearest.outlet_id.clone(),
        status: OrderStatus::Pending,
        total_amount,
        delivery_fee,
        estimated_delivery_time,
        rider: assign_demo_rider(rng),
        delivery_address: draft.delivery_address,
        delivery_lat: draft.delivery_lat,
        delivery_lng: draft.delivery_lng,
        payment_method: draft.payment_method,
        notes: draft.notes,
        items,
        created_at: now,
    };

    state
        .orders
        .insert_header(&order)
        .await
        .map_err(|error| ApplicationError::OrderCreationFailed(error.to_string()))?;

    if let Err(error) = state.orders.insert_items(&order.id, &order.items).await {
        tracing::warn!(
            event_name = "order.items_write_failed",
            order_id = %order.id,
            error = %error,
            "line-item write failed, rolling back order header"
        );
        if let Err(rollback_error) = state.orders.delete(&order.id).await {
            tracing::error!(
                event_name = "order.rollback_failed",
                order_id = %order.id,
                error = %rollback_error,
                "compensating delete failed, header may be orphaned"
            );
        }
        return Err(ApplicationError::OrderItemsCreationFailed(error.to_string()));
    }

    tracing::info!(
        event_name = "order.created",
        order_id = %order.id,
        outlet_id = %order.outlet_id,
        distance_km = nearest.distance_km,
        delivery_fee = order.delivery_fee,
        "order assembled and persisted"
    );

    // Enrichment is best-effort: the order is durable at this point, so a
    // failed re-fetch falls back to the bare header.
    match state.orders.find_detailed(&order.id).await {
        Ok(Some(detailed)) => Ok(PlacedOrder {
            order: detailed.order,
            outlet: detailed.outlet,
            distance_km: nearest.distance_km,
        }),
        Ok(None) => Ok(PlacedOrder { order, outlet: None, distance_km: nearest.distance_km }),
        Err(error) => {
            tracing::warn!(
                event_name = "order.enrichment_failed",
                order_id = %order.id,
                error = %error,
                "returning bare order header"
            );
            Ok(PlacedOrder { order, outlet: None, distance_km: nearest.distance_km })
        }
    }
}

/// Re-run a previous order as a fresh one. Pricing is intentionally not
/// copied: the pipeline re-resolves everything against current catalog state.
pub async fn reorder<R: Rng + ?Sized>(
    state: &AppState,
    rng: &mut R,
    previous: &Order,
    overrides: ReorderOverrides,
) -> Result<PlacedOrder, ApplicationError> {
    let draft = OrderDraft {
        user_id: previous.user_id.clone(),
        items: previous
            .items
            .iter()
            .map(|item| DraftItem {
                product_id: item.product_id.clone(),
                quantity_litres: item.quantity_litres,
            })
            .collect(),
        delivery_address: overrides
            .delivery_address
            .unwrap_or_else(|| previous.delivery_address.clone()),
        delivery_lat: overrides.delivery_lat.unwrap_or(previous.delivery_lat),
        delivery_lng: overrides.delivery_lng.unwrap_or(previous.delivery_lng),
        payment_method: overrides
            .payment_method
            .unwrap_or_else(|| previous.payment_method.clone()),
        notes: previous.notes.clone(),
    };

    place_order(state, rng, draft).await
}

fn validate_draft(draft: &OrderDraft) -> Result<(), ApplicationError> {
    if draft.items.is_empty() {
        return Err(ApplicationError::InvalidInput("items must be a non-empty list".to_string()));
    }

    for item in &draft.items {
        if item.quantity_litres <= Decimal::ZERO {
            return Err(ApplicationError::InvalidInput(format!(
                "quantity_litres for product `{}` must be greater than zero",
                item.product_id
            )));
        }
        if item.quantity_litres > MAX_QUANTITY_LITRES {
            return Err(ApplicationError::InvalidInput(format!(
                "quantity_litres for product `{}` must be at most 10",
                item.product_id
            )));
        }
    }

    if !draft.delivery_lat.is_finite() || !(-90.0..=90.0).contains(&draft.delivery_lat) {
        return Err(ApplicationError::InvalidInput(
            "delivery_lat must be a latitude between -90 and 90".to_string(),
        ));
    }
    if !draft.delivery_lng.is_finite() || !(-180.0..=180.0).contains(&draft.delivery_lng) {
        return Err(ApplicationError::InvalidInput(
            "delivery_lng must be a longitude between -180 and 180".to_string(),
        ));
    }

    Ok(())
}

fn store_error(error: RepositoryError) -> ApplicationError {
    ApplicationError::StoreUnavailable(error.to_string())
}
