use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use jusku_core::delivery;
use jusku_core::domain::outlet::NearestOutlet;
use jusku_core::errors::ApplicationError;

use crate::state::AppState;

use super::{error_response, store_error, ErrorReply};

#[derive(Debug, Deserialize)]
pub struct FeeQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct DeliveryQuoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearest_outlet: Option<NearestOutlet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_minutes: Option<f64>,
    pub delivery_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn fee_quote(
    Query(query): Query<FeeQuery>,
    State(state): State<AppState>,
) -> Result<Json<DeliveryQuoteResponse>, ErrorReply> {
    if !query.lat.is_finite() || !(-90.0..=90.0).contains(&query.lat) {
        return Err(error_response(ApplicationError::InvalidInput(
            "lat must be a latitude between -90 and 90".to_string(),
        )));
    }
    if !query.lng.is_finite() || !(-180.0..=180.0).contains(&query.lng) {
        return Err(error_response(ApplicationError::InvalidInput(
            "lng must be a longitude between -180 and 180".to_string(),
        )));
    }

    let Some(nearest) =
        state.outlets.nearest_active(query.lat, query.lng).await.map_err(store_error)?
    else {
        return Ok(Json(DeliveryQuoteResponse {
            nearest_outlet: None,
            delivery_fee: None,
            estimated_delivery_minutes: None,
            delivery_available: false,
            message: Some("No outlets are currently available in your area".to_string()),
        }));
    };

    let config = &state.config.delivery;
    let available = delivery::delivery_available(config, nearest.distance_km);
    let message = (!available).then(|| {
        format!(
            "{} is {:.1} km away, beyond our {:.0} km delivery radius",
            nearest.name, nearest.distance_km, config.max_radius_km
        )
    });

    Ok(Json(DeliveryQuoteResponse {
        delivery_fee: Some(delivery::delivery_fee(config, nearest.distance_km)),
        estimated_delivery_minutes: Some(delivery::estimated_delivery_minutes(
            config,
            nearest.distance_km,
        )),
        nearest_outlet: Some(nearest),
        delivery_available: available,
        message,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::{Query, State};
    use axum::http::StatusCode;

    use jusku_core::config::AppConfig;
    use jusku_core::domain::outlet::{NearestOutlet, OutletId};
    use jusku_db::repositories::{
        InMemoryOrderRepository, InMemoryOutletRepository, InMemoryProductRepository,
        InMemorySymptomMappingRepository,
    };

    use crate::state::AppState;

    use super::{fee_quote, FeeQuery};

    fn state_with_distance(distance_km: Option<f64>) -> AppState {
        let outlets = match distance_km {
            Some(distance_km) => {
                Arc::new(InMemoryOutletRepository::with_nearest(NearestOutlet {
                    outlet_id: OutletId("outlet-menteng".to_string()),
                    name: "Jusku Menteng".to_string(),
                    address: "Menteng".to_string(),
                    distance_km,
                }))
            }
            None => Arc::new(InMemoryOutletRepository::default()),
        };

        AppState::with_repositories(
            Arc::new(AppConfig::default()),
            Arc::new(InMemoryProductRepository::default()),
            outlets,
            Arc::new(InMemorySymptomMappingRepository::default()),
            Arc::new(InMemoryOrderRepository::default()),
        )
    }

    #[tokio::test]
    async fn quotes_fee_and_eta_within_the_radius() {
        let response = fee_quote(
            Query(FeeQuery { lat: -6.19, lng: 106.83 }),
            State(state_with_distance(Some(2.0))),
        )
        .await
        .expect("quote");

        assert!(response.0.delivery_available);
        assert_eq!(response.0.delivery_fee, Some(6_000));
        assert_eq!(response.0.estimated_delivery_minutes, Some(50.0));
        assert!(response.0.message.is_none());
        assert_eq!(
            response.0.nearest_outlet.as_ref().map(|o| o.outlet_id.0.as_str()),
            Some("outlet-menteng")
        );
    }

    #[tokio::test]
    async fn beyond_the_radius_is_unavailable_with_an_outlet_message() {
        let response = fee_quote(
            Query(FeeQuery { lat: -6.19, lng: 106.83 }),
            State(state_with_distance(Some(25.0))),
        )
        .await
        .expect("quote");

        assert!(!response.0.delivery_available);
        let message = response.0.message.expect("message");
        assert!(message.contains("Jusku Menteng"));
        // The quote is still included for transparency.
        assert_eq!(response.0.delivery_fee, Some(52_000));
    }

    #[tokio::test]
    async fn no_outlets_yields_a_distinct_message() {
        let response =
            fee_quote(Query(FeeQuery { lat: -6.19, lng: 106.83 }), State(state_with_distance(None)))
                .await
                .expect("quote");

        assert!(!response.0.delivery_available);
        assert!(response.0.nearest_outlet.is_none());
        assert_eq!(
            response.0.message.as_deref(),
            Some("No outlets are currently available in your area")
        );
    }

    #[tokio::test]
    async fn rejects_out_of_range_coordinates() {
        let error = fee_quote(
            Query(FeeQuery { lat: 123.0, lng: 106.83 }),
            State(state_with_distance(Some(2.0))),
        )
        .await
        .expect_err("must fail");
        assert_eq!(error.0, StatusCode::BAD_REQUEST);
    }
}
