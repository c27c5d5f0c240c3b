use serde::{Deserialize, Serialize};

/// Rule associating a reported symptom with ingredients to seek out or avoid.
/// One symptom maps to many ingredients; lookups are case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomMapping {
    pub symptom: String,
    pub recommended_ingredients: Vec<String>,
    pub avoid_ingredients: Vec<String>,
    pub description: String,
}
