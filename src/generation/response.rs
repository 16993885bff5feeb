use serde::Serialize;

use super::request::GenerationRequest;
use crate::dietary::FilterOutcome;
use crate::recipe::CandidateRecipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietaryFiltering {
    pub has_conflicts: bool,
    pub allowed_ingredients: Vec<String>,
    pub forbidden_ingredients: Vec<String>,
    pub protein_suggestions: Vec<String>,
    pub message: String,
}

impl DietaryFiltering {
    pub fn from_outcome(outcome: &FilterOutcome, diets: &[String]) -> Self {
        let message = if outcome.has_conflicts() {
            format!(
                "Removed {} ingredient(s) that conflict with {}: {}",
                outcome.forbidden.len(),
                diets.join(", "),
                outcome.forbidden.join(", ")
            )
        } else if diets.is_empty() {
            "No dietary preferences requested".to_string()
        } else {
            "All ingredients are compatible with your dietary preferences".to_string()
        };

        Self {
            has_conflicts: outcome.has_conflicts(),
            allowed_ingredients: outcome.allowed.clone(),
            forbidden_ingredients: outcome.forbidden.clone(),
            protein_suggestions: outcome.protein_suggestions.clone(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationInfo {
    pub total_recipes: usize,
    pub ingredients_used: usize,
    pub dietary_preferences: Vec<String>,
    pub cuisine_type: Option<String>,
    pub meal_type: Option<String>,
    pub source: RecipeSource,
}

/// What a generation call hands back to the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResponse {
    pub recipes: Vec<CandidateRecipe>,
    pub dietary_filtering: DietaryFiltering,
    pub generation_info: GenerationInfo,
}

impl GenerationResponse {
    pub fn assemble(
        request: &GenerationRequest,
        outcome: &FilterOutcome,
        recipes: Vec<CandidateRecipe>,
        source: RecipeSource,
    ) -> Self {
        let generation_info = GenerationInfo {
            total_recipes: recipes.len(),
            ingredients_used: outcome.allowed.len(),
            dietary_preferences: request.dietary_preferences().to_vec(),
            cuisine_type: request.cuisine_type().map(str::to_string),
            meal_type: request.meal_type().map(str::to_string),
            source,
        };

        Self {
            recipes,
            dietary_filtering: DietaryFiltering::from_outcome(outcome, request.dietary_preferences()),
            generation_info,
        }
    }
}
