use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::outlet::{OutletId, OutletSummary};
use crate::domain::product::ProductId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Fixed progress percentage surfaced by order tracking.
    pub fn progress_pct(&self) -> u8 {
        match self {
            Self::Pending => 10,
            Self::Confirmed => 25,
            Self::Preparing => 50,
            Self::OutForDelivery => 75,
            Self::Delivered => 100,
            Self::Cancelled => 0,
        }
    }

    pub fn tracking_message(&self) -> &'static str {
        match self {
            Self::Pending => "Order received and waiting for outlet confirmation",
            Self::Confirmed => "Order confirmed, the outlet will start preparing soon",
            Self::Preparing => "Your juices are being pressed fresh",
            Self::OutForDelivery => "Rider is on the way to your address",
            Self::Delivered => "Order delivered, enjoy your juice",
            Self::Cancelled => "Order was cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "preparing" => Ok(Self::Preparing),
            "out_for_delivery" => Ok(Self::OutForDelivery),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status `{other}`")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderInfo {
    pub name: String,
    pub phone: String,
    pub vehicle_plate: String,
}

/// Demo rider roster. Assignment is intentionally random; real dispatching
/// lives outside this service.
const DEMO_RIDERS: &[(&str, &str, &str)] = &[
    ("Budi Santoso", "+62-812-5550-101", "B 3401 KJU"),
    ("Siti Rahma", "+62-812-5550-102", "B 4172 SKU"),
    ("Agus Wijaya", "+62-812-5550-103", "B 2593 JSQ"),
    ("Dewi Lestari", "+62-812-5550-104", "B 6820 UKJ"),
];

pub fn assign_demo_rider<R: Rng + ?Sized>(rng: &mut R) -> RiderInfo {
    let (name, phone, plate) = DEMO_RIDERS[rng.gen_range(0..DEMO_RIDERS.len())];
    RiderInfo {
        name: name.to_string(),
        phone: phone.to_string(),
        vehicle_plate: plate.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub district: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub quantity_litres: Decimal,
    /// Unit price snapshot taken at order creation; never repriced.
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub outlet_id: OutletId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub delivery_fee: i64,
    pub estimated_delivery_time: DateTime<Utc>,
    pub rider: RiderInfo,
    pub delivery_address: DeliveryAddress,
    pub delivery_lat: f64,
    pub delivery_lng: f64,
    pub payment_method: String,
    pub notes: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
}

/// Order joined with its outlet summary for response enrichment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetailedOrder {
    #[serde(flatten)]
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlet: Option<OutletSummary>,
}

impl Order {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self.status, next),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Preparing)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
                | (OrderStatus::Preparing, OrderStatus::OutForDelivery)
                | (OrderStatus::OutForDelivery, OrderStatus::Delivered)
        )
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidOrderTransition { from: self.status, to: next })
    }
}
