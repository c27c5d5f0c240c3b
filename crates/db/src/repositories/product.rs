use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use jusku_core::domain::product::{Product, ProductId};

use super::{parse_decimal, parse_string_list, ProductRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str =
    "id, name, price_per_litre, ingredients, health_benefits, allergens, is_available";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list_available(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE is_available = 1 ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(product_from_row).collect()
    }

    async fn find_available_by_id(
        &self,
        id: &ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ?1 AND is_available = 1"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(product_from_row).transpose()
    }
}

pub(crate) fn product_from_row(row: &SqliteRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: ProductId(row.try_get::<String, _>("id")?),
        name: row.try_get("name")?,
        price_per_litre: parse_decimal(
            "price_per_litre",
            &row.try_get::<String, _>("price_per_litre")?,
        )?,
        ingredients: parse_string_list("ingredients", &row.try_get::<String, _>("ingredients")?)?,
        health_benefits: parse_string_list(
            "health_benefits",
            &row.try_get::<String, _>("health_benefits")?,
        )?,
        allergens: parse_string_list("allergens", &row.try_get::<String, _>("allergens")?)?,
        is_available: row.try_get::<i64, _>("is_available")? != 0,
    })
}

#[cfg(test)]
mod tests {
    use jusku_core::domain::product::ProductId;
    use rust_decimal::Decimal;

    use crate::repositories::{ProductRepository, SqlProductRepository};
    use crate::{connect_with_settings, migrations};

    async fn pool_with_catalog() -> crate::DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        sqlx::query(
            "INSERT INTO product (id, name, price_per_litre, ingredients, health_benefits, allergens, is_available)
             VALUES
               ('prod-citrus', 'Citrus Immunity', '22000', '[\"Orange\",\"Lemon\"]', '[\"Boosts immunity\"]', '[]', 1),
               ('prod-hidden', 'Seasonal Special', '30000', '[\"Durian\"]', '[]', '[]', 0)",
        )
        .execute(&pool)
        .await
        .expect("seed products");

        pool
    }

    #[tokio::test]
    async fn lists_only_available_products() {
        let pool = pool_with_catalog().await;
        let repo = SqlProductRepository::new(pool.clone());

        let products = repo.list_available().await.expect("list");

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.0, "prod-citrus");
        assert_eq!(products[0].price_per_litre, Decimal::new(22_000, 0));
        assert_eq!(products[0].ingredients, vec!["Orange", "Lemon"]);

        pool.close().await;
    }

    #[tokio::test]
    async fn unavailable_products_are_invisible_by_id() {
        let pool = pool_with_catalog().await;
        let repo = SqlProductRepository::new(pool.clone());

        let found = repo
            .find_available_by_id(&ProductId("prod-hidden".to_string()))
            .await
            .expect("query");
        assert!(found.is_none());

        let found = repo
            .find_available_by_id(&ProductId("prod-citrus".to_string()))
            .await
            .expect("query");
        assert_eq!(found.map(|p| p.name), Some("Citrus Immunity".to_string()));

        pool.close().await;
    }
}
