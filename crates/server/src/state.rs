use std::sync::Arc;

use jusku_core::config::AppConfig;
use jusku_db::repositories::{
    OrderRepository, OutletRepository, ProductRepository, SqlOrderRepository, SqlOutletRepository,
    SqlProductRepository, SqlSymptomMappingRepository, SymptomMappingRepository,
};
use jusku_db::DbPool;

/// Shared handler state. Repositories are trait objects so tests can swap in
/// the in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub products: Arc<dyn ProductRepository>,
    pub outlets: Arc<dyn OutletRepository>,
    pub symptoms: Arc<dyn SymptomMappingRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl AppState {
    pub fn from_pool(config: Arc<AppConfig>, pool: &DbPool) -> Self {
        Self {
            config,
            products: Arc::new(SqlProductRepository::new(pool.clone())),
            outlets: Arc::new(SqlOutletRepository::new(pool.clone())),
            symptoms: Arc::new(SqlSymptomMappingRepository::new(pool.clone())),
            orders: Arc::new(SqlOrderRepository::new(pool.clone())),
        }
    }

    pub fn with_repositories(
        config: Arc<AppConfig>,
        products: Arc<dyn ProductRepository>,
        outlets: Arc<dyn OutletRepository>,
        symptoms: Arc<dyn SymptomMappingRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self { config, products, outlets, symptoms, orders }
    }
}
