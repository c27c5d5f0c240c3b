//! Symptom-based product recommendations.
//!
//! Maps reported symptoms and allergies to a ranked shortlist of catalog
//! products, with a random-sample fallback when nothing scores positively.

mod engine;
mod scoring;
mod types;

pub use engine::RecommendationEngine;
pub use scoring::{build_reasons, score_product, ProductScore};
pub use types::*;

use crate::errors::ApplicationError;

/// Result type for recommendation operations
pub type RecommendationResult<T> = Result<T, ApplicationError>;

/// Points per product ingredient found in the recommended set
pub const INGREDIENT_MATCH_POINTS: i64 = 5;

/// Penalty per product ingredient found in the avoided set
pub const AVOIDED_INGREDIENT_PENALTY: i64 = 10;

/// Points per overlapping (health benefit, symptom) pair
pub const BENEFIT_OVERLAP_POINTS: i64 = 3;

/// Maximum recommendations returned
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Score assigned to fallback picks
pub const FALLBACK_SCORE: i64 = 1;

pub const SCORED_MESSAGE: &str = "Recommendations matched to your symptoms";
pub const FALLBACK_MESSAGE: &str =
    "No specific matches found for your symptoms, so here are some general wellness picks";

pub const FALLBACK_REASONS: [&str; 2] = ["General wellness support", "No conflicting ingredients"];
pub const NEUTRAL_REASON: &str = "Nutritious and refreshing choice";
