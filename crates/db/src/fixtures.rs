use sqlx::Executor;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_PRODUCT_IDS: &[&str] = &[
    "prod-green-detox",
    "prod-citrus-immunity",
    "prod-berry-antioxidant",
    "prod-tropical-energy",
    "prod-beet-stamina",
    "prod-soothing-aloe",
    "prod-golden-turmeric",
    "prod-watermelon-fresh",
    "prod-durian-cream",
];

const SEED_OUTLET_IDS: &[&str] =
    &["outlet-menteng", "outlet-kemang", "outlet-kelapa-gading", "outlet-bandung"];

const SEED_SYMPTOMS: &[&str] = &[
    "headache",
    "flu",
    "fatigue",
    "indigestion",
    "low immunity",
    "dull skin",
    "stress",
    "high blood pressure",
];

/// Demo dataset backing local development and the CLI `seed` command:
/// the juice catalog, Jakarta outlets, and symptom rules.
pub struct DemoSeedDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub products: usize,
    pub outlets: usize,
    pub symptom_mappings: usize,
}

#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub checks: Vec<(&'static str, bool)>,
    pub all_present: bool,
}

impl DemoSeedDataset {
    /// SQL fixture content for the demo dataset.
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_seed_data.sql");

    /// Load the demo dataset into the database. Idempotent.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult {
            products: SEED_PRODUCT_IDS.len(),
            outlets: SEED_OUTLET_IDS.len(),
            symptom_mappings: SEED_SYMPTOMS.len(),
        })
    }

    /// Verify that the seeded rows exist and match the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let product_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM product WHERE id IN {}",
            sql_array(SEED_PRODUCT_IDS)
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("products", product_count == SEED_PRODUCT_IDS.len() as i64));

        let available_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM product WHERE is_available = 1")
                .fetch_one(pool)
                .await?;
        checks.push(("available-products", available_count >= 1));

        let outlet_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM outlet WHERE id IN {}",
            sql_array(SEED_OUTLET_IDS)
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("outlets", outlet_count == SEED_OUTLET_IDS.len() as i64));

        let active_outlet_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM outlet WHERE is_active = 1")
                .fetch_one(pool)
                .await?;
        checks.push(("active-outlets", active_outlet_count >= 1));

        let mapping_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM symptom_mapping WHERE symptom IN {}",
            sql_array(SEED_SYMPTOMS)
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("symptom-mappings", mapping_count == SEED_SYMPTOMS.len() as i64));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { checks, all_present })
    }
}

fn sql_array(ids: &[&str]) -> String {
    let quoted: Vec<String> = ids.iter().map(|id| format!("'{id}'")).collect();
    format!("({})", quoted.join(", "))
}
