use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use serde_json::Value;

use crate::recipe::{CandidateRecipe, RecipeIngredient, PLACEHOLDER_TITLE};

/// Most recipes the text segmentation path will produce for one reply.
pub const MAX_SEGMENTED_RECIPES: usize = 3;
/// Segments shorter than this (after trimming) are treated as noise.
pub const MIN_SEGMENT_CHARS: usize = 50;

static JSON_ARRAY: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").ok());

// A newline followed by "1." or "**Recipe" starts a new section.
static SECTION_BREAK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\n(?:\d+\.|\*\*Recipe)").ok());

static SECTION_TITLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:Recipe \d+:|^\d+\.|^\*\*)(.*?)(?:\n|\*\*)").ok());

/// Strict path: decodes the outermost `[...]` span of the reply as a JSON
/// array and converts each object in it to a recipe. Elements that are not
/// objects are skipped. `None` when there is no such span, it is not a JSON
/// array, or none of its elements is an object.
pub fn extract_json_recipes(raw_text: &str) -> Option<Vec<CandidateRecipe>> {
    let span = JSON_ARRAY.as_ref()?.find(raw_text)?;
    let elements = match serde_json::from_str::<Vec<Value>>(span.as_str()) {
        Ok(elements) => elements,
        Err(e) => {
            debug!("Bracketed span in model reply is not a JSON array: {}", e);
            return None;
        }
    };

    let total = elements.len();
    let recipes: Vec<CandidateRecipe> = elements
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|element| match serde_json::from_value(element) {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                debug!("Skipping undecodable recipe element: {}", e);
                None
            }
        })
        .collect();

    if recipes.len() < total {
        debug!(kept = recipes.len(), total, "Dropped non-recipe array elements");
    }
    if recipes.is_empty() && total > 0 {
        return None;
    }
    Some(recipes)
}

fn split_sections(text: &str) -> Vec<&str> {
    let Some(re) = SECTION_BREAK.as_ref() else {
        return vec![text];
    };

    let mut sections = Vec::new();
    let mut start = 0;
    for boundary in re.find_iter(text) {
        sections.push(&text[start..boundary.start()]);
        // keep the marker with the section it introduces
        start = boundary.start() + 1;
    }
    sections.push(&text[start..]);
    sections
}

fn section_title(section: &str) -> Option<String> {
    let captures = SECTION_TITLE.as_ref()?.captures(section)?;
    let title = captures.get(1)?.as_str().trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn placeholder_recipe(instructions: &str) -> CandidateRecipe {
    CandidateRecipe {
        title: PLACEHOLDER_TITLE.to_string(),
        description: "AI generated recipe".to_string(),
        instructions: instructions.to_string(),
        ingredients: vec![RecipeIngredient::new("Various ingredients", "As needed", "")],
        prep_time: Some(20),
        cook_time: Some(30),
        servings: Some(4),
        difficulty: "Medium".to_string(),
    }
}

/// Lenient path: cuts free text into numbered or "**Recipe" sections and
/// wraps each long enough section in a placeholder recipe.
pub fn segment_text_recipes(raw_text: &str) -> Vec<CandidateRecipe> {
    split_sections(raw_text)
        .into_iter()
        .filter(|section| section.trim().chars().count() >= MIN_SEGMENT_CHARS)
        .take(MAX_SEGMENTED_RECIPES)
        .map(|section| {
            let mut recipe = placeholder_recipe(section.trim());
            if let Some(title) = section_title(section) {
                recipe.title = title;
            }
            recipe
        })
        .collect()
}

/// Turns a model reply into candidate recipes, trying the strict JSON path
/// first and falling back to text segmentation. Never fails; unusable input
/// yields an empty list.
pub fn parse_model_response(raw_text: &str) -> Vec<CandidateRecipe> {
    if let Some(recipes) = extract_json_recipes(raw_text) {
        debug!(count = recipes.len(), "Parsed model reply as JSON");
        return recipes;
    }

    let recipes = segment_text_recipes(raw_text);
    warn!(count = recipes.len(), "Model reply was not a JSON recipe array; segmented free text");
    recipes
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE: &str = "Toss the rice with the broccoli and a splash of soy, then roast everything \
        until crisp at the edges and serve warm with herbs.";

    #[test]
    fn test_extracts_array_between_prose() {
        let recipes = parse_model_response(r#"prefix text [{"title":"A","ingredients":[]}] suffix"#);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "A");
    }

    #[test]
    fn test_extracts_array_from_code_fence() {
        let reply = "```json\n[\n  {\"title\": \"Stir Fry\", \"ingredients\": [{\"name\": \"tofu\", \"amount\": \"200\", \"unit\": \"g\"}], \"prep_time\": 10}\n]\n```";
        let recipes = extract_json_recipes(reply).unwrap();
        assert_eq!(recipes[0].title, "Stir Fry");
        assert_eq!(recipes[0].ingredients[0].name, "tofu");
        assert_eq!(recipes[0].prep_time, Some(10));
    }

    #[test]
    fn test_bad_element_does_not_sink_good_ones() {
        let recipes = parse_model_response(
            r#"[{"title":"Good","ingredients":[{"name":"rice"}]},{"title":"Null","ingredients":null}]"#,
        );
        let titles: Vec<_> = recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Good", "Null"]);
        assert_eq!(recipes[0].ingredients, vec![RecipeIngredient::new("rice", "", "")]);
        assert!(recipes[1].ingredients.is_empty());

        let recipes = parse_model_response(
            r#"[{"title":"Soup","ingredients":[{"amount":"2","unit":"cups"},{"name":"leek"}]}, "stray", 4]"#,
        );
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].title, "Soup");
        assert_eq!(recipes[0].ingredients[0].name, "");
        assert_eq!(recipes[0].ingredients[1].name, "leek");
    }

    #[test]
    fn test_untitled_element_gets_placeholder() {
        let recipes = extract_json_recipes(r#"[{"ingredients":[{"name":"tofu"}]}]"#).unwrap();
        assert_eq!(recipes[0].title, PLACEHOLDER_TITLE);
        assert_eq!(recipes[0].ingredients[0].name, "tofu");
    }

    #[test]
    fn test_malformed_array_is_not_json() {
        assert!(extract_json_recipes("[{\"title\": \"A\",]").is_none());
        assert!(extract_json_recipes("no brackets at all").is_none());
        assert!(extract_json_recipes("[1, 2, 3]").is_none());
    }

    #[test]
    fn test_plain_prose_becomes_single_placeholder() {
        let recipes = parse_model_response(PROSE);
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].instructions, PROSE.trim());
        assert_eq!(recipes[0].title, PLACEHOLDER_TITLE);
        assert_eq!(recipes[0].ingredients[0].name, "Various ingredients");
    }

    #[test]
    fn test_numbered_sections_get_titles_and_cap() {
        let section = "Cook slowly over medium heat, stirring often, until everything is tender and glossy.";
        let reply = format!(
            "Here are ideas:\n1. Garlic Rice\n{s}\n2. Broccoli Bake\n{s}\n3. Leek Soup\n{s}\n4. Extra Dish\n{s}",
            s = section
        );
        let recipes = segment_text_recipes(&reply);
        assert_eq!(recipes.len(), MAX_SEGMENTED_RECIPES);
        assert_eq!(recipes[0].title, "Garlic Rice");
        assert_eq!(recipes[2].title, "Leek Soup");
        assert!(recipes[1].instructions.starts_with("2. Broccoli Bake"));
    }

    #[test]
    fn test_bold_recipe_markers() {
        let body = "Whisk the dressing, toss with the greens and finish with toasted seeds and salt.";
        let reply = format!("**Recipe 1: Green Salad**\n{b}\n**Recipe 2: Seed Crunch**\n{b}", b = body);
        let recipes = segment_text_recipes(&reply);
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].title, "Recipe 1: Green Salad");
        assert_eq!(recipes[1].title, "Recipe 2: Seed Crunch");
    }

    #[test]
    fn test_short_sections_are_discarded() {
        assert!(parse_model_response("1. Too short\n2. Also short").is_empty());
        assert!(parse_model_response("").is_empty());
    }
}
