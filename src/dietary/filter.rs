use std::collections::BTreeSet;

use serde::Serialize;

use super::rules::DietaryRuleTable;

const MEAT_TERMS: &[&str] = &["chicken", "beef", "pork", "meat"];
const SUBSTITUTING_DIETS: &[&str] = &["vegetarian", "vegan"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub allowed: Vec<String>,
    pub forbidden: Vec<String>,
    /// Deduplicated; sorted only so output is stable.
    pub protein_suggestions: Vec<String>,
}

impl FilterOutcome {
    pub fn has_conflicts(&self) -> bool {
        !self.forbidden.is_empty()
    }
}

/// Partitions `ingredients` into allowed and forbidden under `diets`.
///
/// Each ingredient is checked diet by diet in request order and the first
/// diet that forbids it decides: only that diet's proteins are suggested,
/// and only when it is vegetarian or vegan and the ingredient is a generic
/// meat. Diets unknown to `rules` are ignored.
pub fn filter_ingredients<S: AsRef<str>>(
    ingredients: &[String],
    diets: &[S],
    rules: &DietaryRuleTable,
) -> FilterOutcome {
    if diets.is_empty() {
        return FilterOutcome {
            allowed: ingredients.to_vec(),
            ..Default::default()
        };
    }

    let mut outcome = FilterOutcome::default();
    let mut suggestions = BTreeSet::new();

    for ingredient in ingredients {
        match rules.first_violation(ingredient, diets) {
            Some(rule) => {
                outcome.forbidden.push(ingredient.clone());

                let lowered = ingredient.to_lowercase();
                if SUBSTITUTING_DIETS.contains(&rule.diet_name.as_str())
                    && MEAT_TERMS.iter().any(|meat| lowered.contains(meat))
                {
                    suggestions.extend(rule.allowed_proteins.iter().cloned());
                }
            }
            None => outcome.allowed.push(ingredient.clone()),
        }
    }

    outcome.protein_suggestions = suggestions.into_iter().collect();
    outcome
}
