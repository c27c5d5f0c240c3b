//! Scoring rules for symptom-based recommendations

use std::collections::HashSet;

use crate::domain::product::Product;

use super::{
    AVOIDED_INGREDIENT_PENALTY, BENEFIT_OVERLAP_POINTS, INGREDIENT_MATCH_POINTS, NEUTRAL_REASON,
};

/// Raw scoring outcome for a single product
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductScore {
    pub score: i64,
    /// Matched ingredients in the product's original casing
    pub matched_ingredients: Vec<String>,
    /// Health benefits overlapping a requested symptom, deduplicated
    pub overlapping_benefits: Vec<String>,
    /// One avoided ingredient is enough to exclude the product, however
    /// many more it has; the penalty itself stays cumulative.
    pub has_avoided_ingredient: bool,
}

/// Score one product against the folded recommended/avoided ingredient sets
/// and the folded symptom list.
pub fn score_product(
    product: &Product,
    recommended: &HashSet<String>,
    avoided: &HashSet<String>,
    folded_symptoms: &[String],
) -> ProductScore {
    let mut result = ProductScore::default();

    for ingredient in &product.ingredients {
        let folded = ingredient.to_lowercase();

        if avoided.contains(&folded) {
            result.score -= AVOIDED_INGREDIENT_PENALTY;
            result.has_avoided_ingredient = true;
        }

        if recommended.contains(&folded) {
            result.score += INGREDIENT_MATCH_POINTS;
            result.matched_ingredients.push(ingredient.clone());
        }
    }

    for benefit in &product.health_benefits {
        let folded_benefit = benefit.to_lowercase();
        let mut overlapped = false;

        for symptom in folded_symptoms {
            if folded_benefit.contains(symptom.as_str()) || symptom.contains(&folded_benefit) {
                // Uncapped: every overlapping pair counts.
                result.score += BENEFIT_OVERLAP_POINTS;
                overlapped = true;
            }
        }

        if overlapped {
            result.overlapping_benefits.push(benefit.clone());
        }
    }

    result
}

/// Human-readable reasons for a scored product.
pub fn build_reasons(score: &ProductScore) -> Vec<String> {
    let mut reasons = Vec::new();

    if !score.matched_ingredients.is_empty() {
        reasons.push(format!(
            "Contains beneficial ingredients: {}",
            score.matched_ingredients.join(", ")
        ));
    }

    if !score.overlapping_benefits.is_empty() {
        reasons.push(format!(
            "Health benefits match your needs: {}",
            score.overlapping_benefits.join(", ")
        ));
    }

    if reasons.is_empty() {
        reasons.push(NEUTRAL_REASON.to_string());
    }

    reasons
}
