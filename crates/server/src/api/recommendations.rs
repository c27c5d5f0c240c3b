use axum::extract::State;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;

use jusku_core::errors::ApplicationError;
use jusku_core::recommend::{RecommendationEngine, RecommendationReport, RecommendationRequest};

use crate::state::AppState;

use super::{error_response, store_error, ErrorReply};

pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationReport>, ErrorReply> {
    if request.symptoms.is_empty() {
        return Err(error_response(ApplicationError::InvalidInput(
            "symptoms must be a non-empty list".to_string(),
        )));
    }

    let catalog = state.products.list_available().await.map_err(store_error)?;
    let mappings =
        state.symptoms.find_for_symptoms(&request.symptoms).await.map_err(store_error)?;

    let engine = RecommendationEngine::new();
    let mut rng = StdRng::from_entropy();
    let report =
        engine.recommend(&mut rng, &request, &catalog, &mappings).map_err(error_response)?;

    tracing::debug!(
        event_name = "recommendations.served",
        symptom_count = report.symptoms_analyzed.len(),
        recommended = report.recommendations.len(),
        fallback = report.symptom_mappings_found.is_none(),
        "recommendation report generated"
    );

    Ok(Json(report))
}
