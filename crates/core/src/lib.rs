pub mod config;
pub mod delivery;
pub mod domain;
pub mod errors;
pub mod geo;
pub mod recommend;

pub use domain::order::{
    DeliveryAddress, DetailedOrder, Order, OrderId, OrderItem, OrderStatus, RiderInfo,
};
pub use domain::outlet::{NearestOutlet, Outlet, OutletId, OutletSummary};
pub use domain::product::{Product, ProductId};
pub use domain::symptom::SymptomMapping;
pub use errors::{ApplicationError, DomainError};
pub use recommend::{RecommendationEngine, RecommendationReport, RecommendationRequest};
