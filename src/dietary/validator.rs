use tracing::debug;

use super::rules::DietaryRuleTable;
use crate::recipe::CandidateRecipe;

/// Strips ingredients that violate any requested diet and drops recipes that
/// end up with no ingredients. Surviving order is preserved.
pub fn validate_recipes_against_diet<S: AsRef<str>>(
    recipes: Vec<CandidateRecipe>,
    diets: &[S],
    rules: &DietaryRuleTable,
) -> Vec<CandidateRecipe> {
    if diets.is_empty() {
        return recipes;
    }

    recipes
        .into_iter()
        .filter_map(|mut recipe| {
            let before = recipe.ingredients.len();
            recipe
                .ingredients
                .retain(|ingredient| rules.is_compliant(&ingredient.name, diets));

            if recipe.ingredients.len() < before {
                debug!(
                    title = %recipe.title,
                    removed = before - recipe.ingredients.len(),
                    "Stripped non-compliant ingredients"
                );
            }

            if recipe.ingredients.is_empty() {
                debug!(title = %recipe.title, "Dropped recipe with no compliant ingredients");
                None
            } else {
                Some(recipe)
            }
        })
        .collect()
}
