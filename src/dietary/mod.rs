pub mod filter;
pub mod rule_loader;
pub mod rules;
pub mod validator;

pub use filter::{filter_ingredients, FilterOutcome};
pub use rules::{DietRule, DietaryRuleTable};
pub use validator::validate_recipes_against_diet;
