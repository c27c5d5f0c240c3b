//! Delivery fee, ETA, and availability math shared by the order pipeline
//! and the fee-quote endpoint.

use chrono::{DateTime, Duration, Utc};

use crate::config::DeliveryConfig;
use crate::domain::order::OrderStatus;

/// Delivery fee in whole currency units: a base charge plus a per-km charge
/// where any fractional kilometre is billed as a full one.
pub fn delivery_fee(config: &DeliveryConfig, distance_km: f64) -> i64 {
    config.base_fee + config.per_km_fee * distance_km.ceil() as i64
}

/// Travel-time estimate. Unlike the fee, fractional kilometres keep their
/// fractional minutes here.
pub fn estimated_delivery_duration(config: &DeliveryConfig, distance_km: f64) -> Duration {
    let travel_secs = (distance_km * config.minutes_per_km * 60.0).round() as i64;
    Duration::minutes(config.base_minutes) + Duration::seconds(travel_secs)
}

pub fn estimated_delivery_time(
    config: &DeliveryConfig,
    now: DateTime<Utc>,
    distance_km: f64,
) -> DateTime<Utc> {
    now + estimated_delivery_duration(config, distance_km)
}

pub fn estimated_delivery_minutes(config: &DeliveryConfig, distance_km: f64) -> f64 {
    config.base_minutes as f64 + config.minutes_per_km * distance_km
}

pub fn delivery_available(config: &DeliveryConfig, distance_km: f64) -> bool {
    distance_km <= config.max_radius_km
}

/// Whole minutes until the estimated delivery time, clamped at zero.
/// Terminal orders have nothing left to wait for.
pub fn time_remaining_minutes(
    status: OrderStatus,
    estimated_delivery_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<i64> {
    if status.is_terminal() {
        return None;
    }

    Some((estimated_delivery_time - now).num_minutes().max(0))
}
