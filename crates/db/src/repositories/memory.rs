use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use jusku_core::domain::order::{DetailedOrder, Order, OrderId, OrderItem, OrderStatus};
use jusku_core::domain::outlet::NearestOutlet;
use jusku_core::domain::product::{Product, ProductId};
use jusku_core::domain::symptom::SymptomMapping;

use super::{
    OrderRepository, OutletRepository, ProductRepository, RepositoryError,
    SymptomMappingRepository,
};

/// Catalog fake. A `Vec` keeps catalog order, which the recommendation
/// tie-break relies on.
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub async fn insert(&self, product: Product) {
        let mut products = self.products.write().await;
        products.retain(|existing| existing.id != product.id);
        products.push(product);
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_available(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| p.is_available).cloned().collect())
    }

    async fn find_available_by_id(
        &self,
        id: &ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| &p.id == id && p.is_available).cloned())
    }
}

/// Resolver fake: serves whatever nearest outlet the test configured.
#[derive(Default)]
pub struct InMemoryOutletRepository {
    nearest: RwLock<Option<NearestOutlet>>,
}

impl InMemoryOutletRepository {
    pub fn with_nearest(nearest: NearestOutlet) -> Self {
        Self { nearest: RwLock::new(Some(nearest)) }
    }

    pub async fn set_nearest(&self, nearest: Option<NearestOutlet>) {
        *self.nearest.write().await = nearest;
    }
}

#[async_trait::async_trait]
impl OutletRepository for InMemoryOutletRepository {
    async fn nearest_active(
        &self,
        _lat: f64,
        _lng: f64,
    ) -> Result<Option<NearestOutlet>, RepositoryError> {
        Ok(self.nearest.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemorySymptomMappingRepository {
    mappings: RwLock<Vec<SymptomMapping>>,
}

impl InMemorySymptomMappingRepository {
    pub async fn insert(&self, mapping: SymptomMapping) {
        self.mappings.write().await.push(mapping);
    }
}

#[async_trait::async_trait]
impl SymptomMappingRepository for InMemorySymptomMappingRepository {
    async fn find_for_symptoms(
        &self,
        symptoms: &[String],
    ) -> Result<Vec<SymptomMapping>, RepositoryError> {
        let requested: Vec<String> = symptoms.iter().map(|s| s.to_lowercase()).collect();
        let mappings = self.mappings.read().await;
        Ok(mappings
            .iter()
            .filter(|mapping| requested.contains(&mapping.symptom.to_lowercase()))
            .cloned()
            .collect())
    }
}

/// Order store fake with failure toggles so the checkout pipeline's
/// compensation and enrichment-fallback paths can be exercised.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<String, Order>>,
    items: RwLock<HashMap<String, Vec<OrderItem>>>,
    fail_insert_items: AtomicBool,
    fail_detailed: AtomicBool,
}

impl InMemoryOrderRepository {
    /// Make every subsequent `insert_items` call fail.
    pub fn fail_insert_items(&self) {
        self.fail_insert_items.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent `find_detailed` call fail.
    pub fn fail_detailed(&self) {
        self.fail_detailed.store(true, Ordering::SeqCst);
    }

    pub async fn header_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert_header(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut headers = self.orders.write().await;
        let mut header = order.clone();
        header.items = Vec::new();
        headers.insert(order.id.0.clone(), header);
        Ok(())
    }

    async fn insert_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<(), RepositoryError> {
        if self.fail_insert_items.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("simulated item write failure".to_string()));
        }

        self.items.write().await.insert(order_id.0.clone(), items.to_vec());
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<(), RepositoryError> {
        self.orders.write().await.remove(&id.0);
        self.items.write().await.remove(&id.0);
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.read().await.get(&id.0).cloned())
    }

    async fn find_detailed(&self, id: &OrderId) -> Result<Option<DetailedOrder>, RepositoryError> {
        if self.fail_detailed.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("simulated read failure".to_string()));
        }

        let Some(mut order) = self.orders.read().await.get(&id.0).cloned() else {
            return Ok(None);
        };
        order.items = self.items.read().await.get(&id.0).cloned().unwrap_or_default();

        Ok(Some(DetailedOrder { order, outlet: None }))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        let mut result: Vec<Order> =
            orders.values().filter(|order| order.user_id == user_id).cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        if let Some(order) = self.orders.write().await.get_mut(&id.0) {
            order.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use jusku_core::domain::order::{
        DeliveryAddress, Order, OrderId, OrderItem, OrderStatus, RiderInfo,
    };
    use jusku_core::domain::outlet::OutletId;
    use jusku_core::domain::product::{Product, ProductId};

    use crate::repositories::{
        InMemoryOrderRepository, InMemoryProductRepository, OrderRepository, ProductRepository,
        RepositoryError,
    };

    fn product(id: &str, available: bool) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: format!("Juice {id}"),
            price_per_litre: Decimal::new(20_000, 0),
            ingredients: Vec::new(),
            health_benefits: Vec::new(),
            allergens: Vec::new(),
            is_available: available,
        }
    }

    fn order(id: &str) -> Order {
        Order {
            id: OrderId(id.to_string()),
            user_id: "user-1".to_string(),
            outlet_id: OutletId("outlet-menteng".to_string()),
            status: OrderStatus::Pending,
            total_amount: Decimal::new(30_000, 0),
            delivery_fee: 4_000,
            estimated_delivery_time: Utc::now(),
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
                unit_price: Decimal::new(22_000, 0),
                subtotal: Decimal::new(22_000, 0),
            }],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn in_memory_catalog_round_trip() {
        let repo = InMemoryProductRepository::default();
        repo.insert(product("prod-a", true)).await;
        repo.insert(product("prod-b", false)).await;

        let available = repo.list_available().await.expect("list");
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id.0, "prod-a");

        let hidden =
            repo.find_available_by_id(&ProductId("prod-b".to_string())).await.expect("find");
        assert!(hidden.is_none());
    }

    #[tokio::test]
    async fn in_memory_order_round_trip_and_toggles() {
        let repo = InMemoryOrderRepository::default();
        let order = order("order-1");

        repo.insert_header(&order).await.expect("header");
        repo.insert_items(&order.id, &order.items).await.expect("items");

        let detailed = repo.find_detailed(&order.id).await.expect("detailed").expect("present");
        assert_eq!(detailed.order.items.len(), 1);

        repo.fail_insert_items();
        let error = repo.insert_items(&order.id, &order.items).await.expect_err("must fail");
        assert!(matches!(error, RepositoryError::Unavailable(_)));

        repo.fail_detailed();
        assert!(repo.find_detailed(&order.id).await.is_err());
    }
}
