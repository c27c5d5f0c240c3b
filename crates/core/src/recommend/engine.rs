//! Recommendation engine implementation

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::product::Product;
use crate::domain::symptom::SymptomMapping;
use crate::errors::ApplicationError;

use super::scoring::{build_reasons, score_product};
use super::types::*;
use super::{
    RecommendationResult, FALLBACK_MESSAGE, FALLBACK_REASONS, FALLBACK_SCORE, MAX_RECOMMENDATIONS,
    SCORED_MESSAGE,
};

/// Pure rule engine: all catalog and mapping data is passed in, and the
/// randomness source for the fallback path is injected so callers can seed it.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn recommend<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        request: &RecommendationRequest,
        catalog: &[Product],
        mappings: &[SymptomMapping],
    ) -> RecommendationResult<RecommendationReport> {
        if request.symptoms.is_empty() {
            return Err(ApplicationError::InvalidInput(
                "symptoms must be a non-empty list".to_string(),
            ));
        }

        let folded_symptoms: Vec<String> =
            request.symptoms.iter().map(|s| s.to_lowercase()).collect();
        let symptom_set: HashSet<&str> = folded_symptoms.iter().map(String::as_str).collect();

        let matched_mappings: Vec<&SymptomMapping> = mappings
            .iter()
            .filter(|mapping| symptom_set.contains(mapping.symptom.to_lowercase().as_str()))
            .collect();

        let mut recommended: HashSet<String> = HashSet::new();
        let mut avoided: HashSet<String> = HashSet::new();
        for mapping in &matched_mappings {
            recommended.extend(mapping.recommended_ingredients.iter().map(|i| i.to_lowercase()));
            avoided.extend(mapping.avoid_ingredients.iter().map(|i| i.to_lowercase()));
        }
        // Allergies are always avoided, whether or not any symptom matched.
        avoided.extend(request.allergies.iter().map(|a| a.to_lowercase()));

        let available: Vec<&Product> = catalog.iter().filter(|p| p.is_available).collect();
        let total_products_analyzed = available.len();

        let mut scored = Vec::new();
        for product in &available {
            let outcome = score_product(product, &recommended, &avoided, &folded_symptoms);

            // Products with an avoided ingredient are never surfaced.
            if outcome.has_avoided_ingredient || outcome.score <= 0 {
                continue;
            }

            let reasons = build_reasons(&outcome);
            scored.push(RecommendedProduct {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price_per_litre: product.price_per_litre,
                ingredients: product.ingredients.clone(),
                health_benefits: product.health_benefits.clone(),
                recommendation_score: outcome.score,
                matched_ingredients: outcome.matched_ingredients,
                reasons,
            });
        }

        // Stable sort keeps catalog order for ties.
        scored.sort_by(|a, b| b.recommendation_score.cmp(&a.recommendation_score));
        scored.truncate(MAX_RECOMMENDATIONS);

        if scored.is_empty() {
            let fallback = self.fallback_picks(rng, &available, &avoided);
            return Ok(RecommendationReport {
                message: FALLBACK_MESSAGE.to_string(),
                recommendations: fallback,
                symptoms_analyzed: request.symptoms.clone(),
                allergies_considered: request.allergies.clone(),
                total_products_analyzed,
                symptom_mappings_found: None,
            });
        }

        Ok(RecommendationReport {
            message: SCORED_MESSAGE.to_string(),
            recommendations: scored,
            symptoms_analyzed: request.symptoms.clone(),
            allergies_considered: request.allergies.clone(),
            total_products_analyzed,
            symptom_mappings_found: Some(matched_mappings.len()),
        })
    }

    /// Random variety, not a ranking: sample products free of avoided
    /// ingredients and give each the fixed fallback score and reasons.
    fn fallback_picks<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        available: &[&Product],
        avoided: &HashSet<String>,
    ) -> Vec<RecommendedProduct> {
        let safe: Vec<&Product> = available
            .iter()
            .copied()
            .filter(|product| {
                !product.ingredients.iter().any(|i| avoided.contains(&i.to_lowercase()))
            })
            .collect();

        safe.choose_multiple(rng, MAX_RECOMMENDATIONS)
            .map(|product| RecommendedProduct {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price_per_litre: product.price_per_litre,
                ingredients: product.ingredients.clone(),
                health_benefits: product.health_benefits.clone(),
                recommendation_score: FALLBACK_SCORE,
                matched_ingredients: Vec::new(),
                reasons: FALLBACK_REASONS.iter().map(|r| r.to_string()).collect(),
            })
            .collect()
    }
}
