use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use jusku_core::domain::order::{
    DeliveryAddress, DetailedOrder, Order, OrderId, OrderItem, OrderStatus, RiderInfo,
};
use jusku_core::domain::outlet::{OutletId, OutletSummary};
use jusku_core::domain::product::ProductId;

use super::{parse_decimal, parse_status, OrderRepository, RepositoryError};
use crate::DbPool;

const ORDER_COLUMNS: &str = "id, user_id, outlet_id, status, total_amount, delivery_fee, \
     estimated_delivery_time, rider_name, rider_phone, rider_plate, \
     street, city, district, delivery_lat, delivery_lng, payment_method, notes, created_at";

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn insert_header(&self, order: &Order) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO customer_order (
                 id, user_id, outlet_id, status, total_amount, delivery_fee,
                 estimated_delivery_time, rider_name, rider_phone, rider_plate,
                 street, city, district, delivery_lat, delivery_lng,
                 payment_method, notes, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        )
        .bind(&order.id.0)
        .bind(&order.user_id)
        .bind(&order.outlet_id.0)
        .bind(order.status.as_str())
        .bind(order.total_amount.to_string())
        .bind(order.delivery_fee)
        .bind(order.estimated_delivery_time)
        .bind(&order.rider.name)
        .bind(&order.rider.phone)
        .bind(&order.rider.vehicle_plate)
        .bind(&order.delivery_address.street)
        .bind(&order.delivery_address.city)
        .bind(&order.delivery_address.district)
        .bind(order.delivery_lat)
        .bind(order.delivery_lng)
        .bind(&order.payment_method)
        .bind(&order.notes)
        .bind(order.created_at)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_items(
        &self,
        order_id: &OrderId,
        items: &[OrderItem],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_item (order_id, product_id, quantity_litres, unit_price, subtotal)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(&order_id.0)
            .bind(&item.product_id.0)
            .bind(item.quantity_litres.to_string())
            .bind(item.unit_price.to_string())
            .bind(item.subtotal.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<(), RepositoryError> {
        // Cascades to order_item rows.
        sqlx::query("DELETE FROM customer_order WHERE id = ?1")
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let row =
            sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = ?1"))
                .bind(&id.0)
                .fetch_optional(&self.pool)
                .await?;

        row.as_ref().map(order_from_row).transpose()
    }

    async fn find_detailed(&self, id: &OrderId) -> Result<Option<DetailedOrder>, RepositoryError> {
        let Some(mut order) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let item_rows = sqlx::query(
            "SELECT oi.product_id, oi.quantity_litres, oi.unit_price, oi.subtotal,
                    p.name AS product_name
             FROM order_item oi
             LEFT JOIN product p ON p.id = oi.product_id
             WHERE oi.order_id = ?1
             ORDER BY oi.id",
        )
        .bind(&id.0)
        .fetch_all(&self.pool)
        .await?;

        order.items = item_rows
            .iter()
            .map(|row| {
                Ok(OrderItem {
                    product_id: ProductId(row.try_get::<String, _>("product_id")?),
                    product_name: row.try_get("product_name")?,
                    quantity_litres: parse_decimal(
                        "quantity_litres",
                        &row.try_get::<String, _>("quantity_litres")?,
                    )?,
                    unit_price: parse_decimal(
                        "unit_price",
                        &row.try_get::<String, _>("unit_price")?,
                    )?,
                    subtotal: parse_decimal("subtotal", &row.try_get::<String, _>("subtotal")?)?,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        let outlet = sqlx::query("SELECT id, name, address FROM outlet WHERE id = ?1")
            .bind(&order.outlet_id.0)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| {
                Ok::<OutletSummary, RepositoryError>(OutletSummary {
                    id: OutletId(row.try_get::<String, _>("id")?),
                    name: row.try_get("name")?,
                    address: row.try_get("address")?,
                })
            })
            .transpose()?;

        Ok(Some(DetailedOrder { order, outlet }))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order
             WHERE user_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(order_from_row).collect()
    }

    async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE customer_order SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(&id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn order_from_row(row: &SqliteRow) -> Result<Order, RepositoryError> {
    Ok(Order {
        id: OrderId(row.try_get::<String, _>("id")?),
        user_id: row.try_get("user_id")?,
        outlet_id: OutletId(row.try_get::<String, _>("outlet_id")?),
        status: parse_status(&row.try_get::<String, _>("status")?)?,
        total_amount: parse_decimal("total_amount", &row.try_get::<String, _>("total_amount")?)?,
        delivery_fee: row.try_get("delivery_fee")?,
        estimated_delivery_time: row.try_get::<DateTime<Utc>, _>("estimated_delivery_time")?,
        rider: RiderInfo {
            name: row.try_get("rider_name")?,
            phone: row.try_get("rider_phone")?,
            vehicle_plate: row.try_get("rider_plate")?,
        },
        delivery_address: DeliveryAddress {
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            district: row.try_get("district")?,
        },
        delivery_lat: row.try_get("delivery_lat")?,
        delivery_lng: row.try_get("delivery_lng")?,
        payment_method: row.try_get("payment_method")?,
        notes: row.try_get("notes")?,
        items: Vec::new(),
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use jusku_core::domain::order::{
        DeliveryAddress, Order, OrderId, OrderItem, OrderStatus, RiderInfo,
    };
    use jusku_core::domain::outlet::OutletId;
    use jusku_core::domain::product::ProductId;

    use crate::repositories::{OrderRepository, SqlOrderRepository};
    use crate::{connect_with_settings, migrations};

    async fn pool() -> crate::DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        sqlx::query(
            "INSERT INTO outlet (id, name, address, lat, lng, is_active)
             VALUES ('outlet-menteng', 'Jusku Menteng', 'Menteng', -6.19, 106.83, 1)",
        )
        .execute(&pool)
        .await
        .expect("seed outlet");
        sqlx::query(
            "INSERT INTO product (id, name, price_per_litre, ingredients, health_benefits, allergens, is_available)
             VALUES ('prod-citrus', 'Citrus Immunity', '22000', '[]', '[]', '[]', 1)",
        )
        .execute(&pool)
        .await
        .expect("seed product");

        pool
    }

    fn order() -> Order {
        Order {
            id: OrderId::new(),
            user_id: "user-1".to_string(),
            outlet_id: OutletId("outlet-menteng".to_string()),
            status: OrderStatus::Pending,
            total_amount: Decimal::new(19_000, 0),
            delivery_fee: 8_000,
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
            notes: Some("less ice".to_string()),
            items: vec![OrderItem {
                product_id: ProductId("prod-citrus".to_string()),
                product_name: None,
                quantity_litres: Decimal::new(5, 1),
                unit_price: Decimal::new(22_000, 0),
                subtotal: Decimal::new(11_000, 0),
            }],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn header_round_trips_exactly() {
        let pool = pool().await;
        let repo = SqlOrderRepository::new(pool.clone());
        let order = order();

        repo.insert_header(&order).await.expect("insert header");
        let found = repo.find_by_id(&order.id).await.expect("find").expect("present");

        assert_eq!(found.user_id, order.user_id);
        assert_eq!(found.status, OrderStatus::Pending);
        assert_eq!(found.total_amount, order.total_amount);
        assert_eq!(found.delivery_fee, order.delivery_fee);
        assert_eq!(found.rider, order.rider);
        assert_eq!(found.notes, order.notes);
        assert!(found.items.is_empty(), "find_by_id returns the bare header");

        pool.close().await;
    }

    #[tokio::test]
    async fn detailed_fetch_joins_items_and_outlet() {
        let pool = pool().await;
        let repo = SqlOrderRepository::new(pool.clone());
        let order = order();

        repo.insert_header(&order).await.expect("insert header");
        repo.insert_items(&order.id, &order.items).await.expect("insert items");

        let detailed = repo.find_detailed(&order.id).await.expect("find").expect("present");

        assert_eq!(detailed.order.items.len(), 1);
        let item = &detailed.order.items[0];
        assert_eq!(item.product_name.as_deref(), Some("Citrus Immunity"));
        assert_eq!(item.quantity_litres, Decimal::new(5, 1));
        assert_eq!(item.subtotal, Decimal::new(11_000, 0));

        let outlet = detailed.outlet.expect("outlet summary");
        assert_eq!(outlet.id.0, "outlet-menteng");

        pool.close().await;
    }

    #[tokio::test]
    async fn delete_removes_header_and_items() {
        let pool = pool().await;
        let repo = SqlOrderRepository::new(pool.clone());
        let order = order();

        repo.insert_header(&order).await.expect("insert header");
        repo.insert_items(&order.id, &order.items).await.expect("insert items");
        repo.delete(&order.id).await.expect("delete");

        assert!(repo.find_by_id(&order.id).await.expect("find").is_none());
        let leftover: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_item WHERE order_id = ?1")
            .bind(&order.id.0)
            .fetch_one(&pool)
            .await
            .expect("count items");
        assert_eq!(leftover, 0, "cascade should remove line items");

        pool.close().await;
    }

    #[tokio::test]
    async fn status_updates_are_visible() {
        let pool = pool().await;
        let repo = SqlOrderRepository::new(pool.clone());
        let order = order();

        repo.insert_header(&order).await.expect("insert header");
        repo.update_status(&order.id, OrderStatus::Cancelled).await.expect("update");

        let found = repo.find_by_id(&order.id).await.expect("find").expect("present");
        assert_eq!(found.status, OrderStatus::Cancelled);

        pool.close().await;
    }

    #[tokio::test]
    async fn lists_orders_for_one_user_only() {
        let pool = pool().await;
        let repo = SqlOrderRepository::new(pool.clone());

        let mine = order();
        let mut theirs = order();
        theirs.id = OrderId::new();
        theirs.user_id = "user-2".to_string();

        repo.insert_header(&mine).await.expect("insert mine");
        repo.insert_header(&theirs).await.expect("insert theirs");

        let orders = repo.list_for_user("user-1").await.expect("list");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, mine.id);

        pool.close().await;
    }
}
