use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use jusku_core::domain::order::{DetailedOrder, Order, OrderId, OrderItem, OrderStatus};
use jusku_core::domain::outlet::NearestOutlet;
use jusku_core::domain::product::{Product, ProductId};
use jusku_core::domain::symptom::SymptomMapping;

pub mod memory;
pub mod order;
pub mod outlet;
pub mod product;
pub mod symptom;

pub use memory::{
    InMemoryOrderRepository, InMemoryOutletRepository, InMemoryProductRepository,
    InMemorySymptomMappingRepository,
};
pub use order::SqlOrderRepository;
pub use outlet::SqlOutletRepository;
pub use product::SqlProductRepository;
pub use symptom::SqlSymptomMappingRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_available(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn find_available_by_id(
        &self,
        id: &ProductId,
    ) -> Result<Option<Product>, RepositoryError>;
}

#[async_trait]
pub trait OutletRepository: Send + Sync {
    /// Closest active outlet to the given coordinate, or `None` when no
    /// active outlet exists.
    async fn nearest_active(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Option<NearestOutlet>, RepositoryError>;
}

#[async_trait]
pub trait SymptomMappingRepository: Send + Sync {
    /// Mappings whose symptom matches one of the requested symptoms,
    /// case-insensitively.
    async fn find_for_symptoms(
        &self,
        symptoms: &[String],
    ) -> Result<Vec<SymptomMapping>, RepositoryError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_header(&self, order: &Order) -> Result<(), RepositoryError>;
    async fn insert_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<(), RepositoryError>;
    /// Compensating delete for a header whose items could not be written.
    async fn delete(&self, id: &OrderId) -> Result<(), RepositoryError>;
    /// Header only; `items` is left empty.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;
    /// Header joined with items, product names, and the outlet summary.
    async fn find_detailed(&self, id: &OrderId) -> Result<Option<DetailedOrder>, RepositoryError>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>, RepositoryError>;
    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError>;
}

pub(crate) fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, RepositoryError> {
    raw.parse::<Decimal>()
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn parse_string_list(column: &str, raw: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn parse_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    raw.parse::<OrderStatus>().map_err(RepositoryError::Decode)
}
