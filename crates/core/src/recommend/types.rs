//! Types for the recommendation engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// Request for product recommendations
#[derive(Clone, Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Symptoms reported by the user; must be non-empty
    pub symptoms: Vec<String>,
    /// Ingredients the user is allergic to; always avoided
    #[serde(default)]
    pub allergies: Vec<String>,
}

impl RecommendationRequest {
    pub fn new(symptoms: Vec<String>) -> Self {
        Self { symptoms, allergies: Vec::new() }
    }

    pub fn with_allergies(mut self, allergies: Vec<String>) -> Self {
        self.allergies = allergies;
        self
    }
}

/// One recommended product with its score and human-readable reasoning
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendedProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price_per_litre: Decimal,
    pub ingredients: Vec<String>,
    pub health_benefits: Vec<String>,
    pub recommendation_score: i64,
    /// Matched ingredients in the product's original casing
    pub matched_ingredients: Vec<String>,
    pub reasons: Vec<String>,
}

/// Full recommendation report echoed back to the caller
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub message: String,
    pub recommendations: Vec<RecommendedProduct>,
    pub symptoms_analyzed: Vec<String>,
    pub allergies_considered: Vec<String>,
    pub total_products_analyzed: usize,
    /// Only reported on the scored path; the fallback path found none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptom_mappings_found: Option<usize>,
}
