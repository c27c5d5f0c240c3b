use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutletId(pub String);

impl std::fmt::Display for OutletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: OutletId,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub is_active: bool,
}

/// Result of nearest-outlet resolution for a delivery coordinate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearestOutlet {
    pub outlet_id: OutletId,
    pub name: String,
    pub address: String,
    pub distance_km: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutletSummary {
    pub id: OutletId,
    pub name: String,
    pub address: String,
}
