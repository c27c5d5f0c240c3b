use sqlx::QueryBuilder;
use sqlx::Row;

use jusku_core::domain::symptom::SymptomMapping;

use super::{parse_string_list, RepositoryError, SymptomMappingRepository};
use crate::DbPool;

pub struct SqlSymptomMappingRepository {
    pool: DbPool,
}

impl SqlSymptomMappingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SymptomMappingRepository for SqlSymptomMappingRepository {
    async fn find_for_symptoms(
        &self,
        symptoms: &[String],
    ) -> Result<Vec<SymptomMapping>, RepositoryError> {
        if symptoms.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder = QueryBuilder::new(
            "SELECT symptom, recommended_ingredients, avoid_ingredients, description
             FROM symptom_mapping WHERE lower(symptom) IN (",
        );
        let mut separated = query_builder.separated(", ");
        for symptom in symptoms {
            separated.push_bind(symptom.to_lowercase());
        }
        query_builder.push(") ORDER BY symptom");

        let rows = query_builder.build().fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| {
                Ok(SymptomMapping {
                    symptom: row.try_get("symptom")?,
                    recommended_ingredients: parse_string_list(
                        "recommended_ingredients",
                        &row.try_get::<String, _>("recommended_ingredients")?,
                    )?,
                    avoid_ingredients: parse_string_list(
                        "avoid_ingredients",
                        &row.try_get::<String, _>("avoid_ingredients")?,
                    )?,
                    description: row.try_get("description")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::repositories::{SqlSymptomMappingRepository, SymptomMappingRepository};
    use crate::{connect_with_settings, migrations};

    async fn pool_with_mappings() -> crate::DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 5).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");

        sqlx::query(
            "INSERT INTO symptom_mapping (symptom, recommended_ingredients, avoid_ingredients, description) VALUES
               ('flu', '[\"orange\",\"ginger\"]', '[\"milk\"]', 'Vitamin C support'),
               ('fatigue', '[\"banana\"]', '[]', 'Energy support')",
        )
        .execute(&pool)
        .await
        .expect("seed mappings");

        pool
    }

    #[tokio::test]
    async fn matches_symptoms_case_insensitively() {
        let pool = pool_with_mappings().await;
        let repo = SqlSymptomMappingRepository::new(pool.clone());

        let mappings = repo
            .find_for_symptoms(&["FLU".to_string(), "unknown".to_string()])
            .await
            .expect("lookup");

        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].symptom, "flu");
        assert_eq!(mappings[0].recommended_ingredients, vec!["orange", "ginger"]);
        assert_eq!(mappings[0].avoid_ingredients, vec!["milk"]);

        pool.close().await;
    }

    #[tokio::test]
    async fn empty_symptom_list_short_circuits() {
        let pool = pool_with_mappings().await;
        let repo = SqlSymptomMappingRepository::new(pool.clone());

        let mappings = repo.find_for_symptoms(&[]).await.expect("lookup");
        assert!(mappings.is_empty());

        pool.close().await;
    }
}
