use sqlx::Row;

use jusku_core::domain::outlet::{NearestOutlet, OutletId};
use jusku_core::geo::haversine_km;

use super::{OutletRepository, RepositoryError};
use crate::DbPool;

/// Nearest-outlet resolution over the `outlet` table: active outlets are
/// fetched and ranked by great-circle distance. The outlet count is small
/// enough that a full scan beats maintaining a spatial index.
pub struct SqlOutletRepository {
    pool: DbPool,
}

impl SqlOutletRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OutletRepository for SqlOutletRepository {
    async fn nearest_active(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Option<NearestOutlet>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name, address, lat, lng FROM outlet WHERE is_active = 1")
            .fetch_all(&self.pool)
            .await?;

        let mut best: Option<NearestOutlet> = None;
        for row in rows {
            let outlet_lat: f64 = row.try_get("lat")?;
            let outlet_lng: f64 = row.try_get("lng")?;
            let distance_km = haversine_km(lat, lng, outlet_lat, outlet_lng);

            if best.as_ref().map_or(true, |current| distance_km < current.distance_km) {
                best = Some(NearestOutlet {
                    outlet_id: OutletId(row.try_get::<String, _>("id")?),
                    name: row.try_get("name")?,
                    address: row.try_get("address")?,
                    distance_km,
                });
            }
        }

        Ok(best)
    }
}
