use crate::dietary::{filter_ingredients, DietaryRuleTable};
use crate::recipe::{CandidateRecipe, RecipeIngredient};

fn requests_diet<S: AsRef<str>>(diets: &[S], name: &str) -> bool {
    diets.iter().any(|diet| diet.as_ref().eq_ignore_ascii_case(name))
}

fn cups_of(names: &[String]) -> Vec<RecipeIngredient> {
    names
        .iter()
        .map(|name| RecipeIngredient::new(name.as_str(), "1 cup", "cup"))
        .collect()
}

fn title_pair(names: &[String]) -> String {
    names.iter().take(2).cloned().collect::<Vec<_>>().join(" & ")
}

/// Canned single-recipe answer used when the model cannot be reached or
/// returns nothing usable. Deterministic for a given input.
pub fn fallback_recipes<S: AsRef<str>>(
    ingredients: &[String],
    diets: &[S],
    rules: &DietaryRuleTable,
) -> Vec<CandidateRecipe> {
    let vegetarian = requests_diet(diets, "vegetarian");
    let vegan = requests_diet(diets, "vegan");

    let mut allowed = filter_ingredients(ingredients, diets, rules).allowed;
    if allowed.is_empty() {
        let substitutes: &[&str] = if vegetarian {
            &["tofu", "vegetables", "rice"]
        } else if vegan {
            &["tofu", "vegetables", "quinoa"]
        } else {
            &["vegetables", "rice"]
        };
        allowed = substitutes.iter().map(|s| s.to_string()).collect();
    }

    let listed = allowed.join(", ");
    let recipe = if vegetarian {
        let mut ingredients = cups_of(&allowed);
        ingredients.push(RecipeIngredient::new("olive oil", "2 tbsp", "tbsp"));
        CandidateRecipe {
            title: format!("Vegetarian {} Stir-Fry", title_pair(&allowed)),
            description: "A delicious vegetarian dish using your ingredients".to_string(),
            instructions: format!(
                "1. Heat oil in a pan. 2. Add {} and stir-fry for 8-10 minutes. \
                 3. Season with herbs and spices. 4. Serve hot with rice or quinoa.",
                listed
            ),
            ingredients,
            prep_time: Some(10),
            cook_time: Some(15),
            servings: Some(2),
            difficulty: "Easy".to_string(),
        }
    } else if vegan {
        let mut ingredients = cups_of(&allowed);
        ingredients.push(RecipeIngredient::new("quinoa", "1 cup", "cup"));
        ingredients.push(RecipeIngredient::new("olive oil", "2 tbsp", "tbsp"));
        CandidateRecipe {
            title: format!("Vegan {} Bowl", title_pair(&allowed)),
            description: "A nutritious vegan recipe using your ingredients".to_string(),
            instructions: format!(
                "1. Prepare {} by washing and chopping. 2. Cook quinoa according to package \
                 directions. 3. Sauté vegetables in olive oil. 4. Combine all ingredients and serve.",
                listed
            ),
            ingredients,
            prep_time: Some(15),
            cook_time: Some(20),
            servings: Some(2),
            difficulty: "Easy".to_string(),
        }
    } else {
        let first = &allowed[0];
        CandidateRecipe {
            title: format!("Simple {} Dish", title_pair(&allowed)),
            description: "A quick and easy recipe using your ingredients".to_string(),
            instructions: format!(
                "1. Prepare your {first} by washing and chopping. 2. Heat oil in a pan. \
                 3. Add {first} and cook for 5 minutes. 4. Add remaining ingredients and season \
                 to taste. 5. Cook until tender and serve hot.",
                first = first
            ),
            ingredients: cups_of(&allowed),
            prep_time: Some(10),
            cook_time: Some(20),
            servings: Some(2),
            difficulty: "Easy".to_string(),
        }
    };

    vec![recipe]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn names(recipe: &CandidateRecipe) -> Vec<&str> {
        recipe.ingredients.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_generic_template() {
        let rules = DietaryRuleTable::builtin();
        let recipes = fallback_recipes::<&str>(&strings(&["leek", "potato", "chive"]), &[], &rules);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Simple leek & potato Dish");
        assert!(recipes[0].instructions.starts_with("1. Prepare your leek"));
        assert_eq!(names(&recipes[0]), vec!["leek", "potato", "chive"]);
    }

    #[test]
    fn test_vegan_template_filters_and_adds_staples() {
        let rules = DietaryRuleTable::builtin();
        let recipes = fallback_recipes(&strings(&["chicken", "milk", "rice", "broccoli"]), &["vegan"], &rules);
        assert_eq!(recipes[0].title, "Vegan rice & broccoli Bowl");
        assert_eq!(names(&recipes[0]), vec!["rice", "broccoli", "quinoa", "olive oil"]);
    }

    #[test]
    fn test_vegetarian_takes_precedence_over_vegan() {
        let rules = DietaryRuleTable::builtin();
        let recipes = fallback_recipes(&strings(&["rice"]), &["Vegan", "VEGETARIAN"], &rules);
        assert!(recipes[0].title.starts_with("Vegetarian"));
        assert_eq!(names(&recipes[0]), vec!["rice", "olive oil"]);
    }

    #[test]
    fn test_substitutes_when_everything_is_forbidden() {
        let rules = DietaryRuleTable::builtin();
        let vegan = fallback_recipes(&strings(&["beef", "cheese"]), &["vegan"], &rules);
        assert_eq!(vegan[0].title, "Vegan tofu & vegetables Bowl");
        let vegetarian = fallback_recipes(&strings(&["bacon"]), &["vegetarian"], &rules);
        assert_eq!(vegetarian[0].title, "Vegetarian tofu & vegetables Stir-Fry");
        let gluten_free = fallback_recipes(&strings(&["bread"]), &["gluten-free"], &rules);
        assert_eq!(gluten_free[0].title, "Simple vegetables & rice Dish");
    }

    #[test]
    fn test_is_deterministic() {
        let rules = DietaryRuleTable::builtin();
        let input = strings(&["tofu", "kale"]);
        assert_eq!(
            fallback_recipes(&input, &["vegan"], &rules),
            fallback_recipes(&input, &["vegan"], &rules)
        );
    }
}
