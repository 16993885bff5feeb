use crate::dietary::DietaryRuleTable;

const PERSONA: &str = "You are a professional chef and recipe developer. \
Create 2-3 detailed, restaurant-quality recipes using these ingredients: ";

const STYLE_EXAMPLE: &str = r#"
EXAMPLES OF THE QUALITY I EXPECT:

Example Recipe Format:
**Chicken & Spinach Tomato Pasta with Roasted Potatoes** (serves 2-3)

**Ingredients:**
- Pasta – 200g (penne, fusilli, or your choice)
- Chicken breast – 1 large (≈250g), cut into 2cm cubes
- Tomatoes – 3 medium (≈350g total), diced
- Potatoes – 2 medium (≈300g total), scrubbed and cut into 1cm cubes
- Spinach – 100g fresh, roughly chopped
- Olive oil – 3 Tbsp
- Salt & black pepper – to taste
- Optional: 1 tsp dried oregano, pinch of chili flakes

**Instructions:**
1. **Roast the potatoes:** Preheat oven to 200°C (390°F). Toss potato cubes with 1 Tbsp olive oil, ½ tsp salt and pepper. Spread on baking sheet and roast 25-30 minutes until golden-brown and crisp.

2. **Cook the pasta:** Bring large pot of water to boil. Salt generously (≈1 Tbsp). Add pasta and cook until al dente (8-10 min). Reserve ½ cup pasta water, then drain.

3. **Sear the chicken:** Heat large skillet over medium-high heat. Add 1 Tbsp olive oil, then cubed chicken. Season and sear until golden all over, 6-8 minutes. Transfer to plate.

4. **Build the sauce:** In same skillet, add diced tomatoes, salt, oregano and chili flakes. Cook until tomatoes soften, 4-5 minutes. Add spinach and cook until wilted, 1-2 minutes.

5. **Combine & finish:** Return chicken to skillet. Add drained pasta and reserved pasta water. Toss 1-2 minutes until sauce coats noodles. Adjust seasoning.

6. **Serve:** Divide pasta between plates. Add roasted potatoes alongside. Drizzle with extra olive oil if desired.

**Total time:** ≈40 minutes
"#;

const REQUIREMENTS: &str = r#"
YOUR TASK:
Create recipes with this level of detail, professional techniques, and clear step-by-step instructions.

REQUIREMENTS:
- Use ALL the provided ingredients creatively
- Include specific quantities and measurements
- Add complementary ingredients to make complete, balanced meals
- Provide professional cooking techniques and tips
- Include cooking times and temperatures
- Make instructions clear and detailed
- Create recipes that are practical and achievable"#;

const OUTPUT_FORMAT: &str = r#"

**JSON FORMAT:**
Return your response as a JSON array with this exact structure:

[
  {
    "title": "Professional Recipe Name",
    "description": "Detailed description highlighting key flavors and techniques",
    "instructions": "1. First step with specific technique and timing. 2. Second step with temperature and visual cues. 3. Continue with detailed professional instructions...",
    "ingredients": [
      {"name": "main ingredient", "amount": "200", "unit": "g"},
      {"name": "secondary ingredient", "amount": "3", "unit": "medium"},
      {"name": "seasoning", "amount": "1", "unit": "tsp"}
    ],
    "prep_time": 15,
    "cook_time": 25,
    "servings": 2,
    "difficulty": "Easy"
  }
]

**CRITICAL:**
- Make each recipe unique and creative
- Use professional cooking terminology
- Include specific weights/measurements where appropriate
- Provide detailed, step-by-step instructions like a professional cookbook
- Ensure perfect JSON formatting
- Focus on flavor development and proper technique
"#;

/// `None`, blank and "any" all mean no preference.
fn preference(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("any"))
}

/// Formats the generation prompt. The output depends only on the arguments.
pub fn build_prompt<S: AsRef<str>>(
    ingredients: &[String],
    diets: &[S],
    cuisine_type: Option<&str>,
    meal_type: Option<&str>,
    protein_suggestions: &[String],
    rules: &DietaryRuleTable,
) -> String {
    let mut prompt = String::from("\n");
    prompt.push_str(PERSONA);
    prompt.push_str(&ingredients.join(", "));
    prompt.push('\n');
    prompt.push_str(STYLE_EXAMPLE);
    prompt.push_str(REQUIREMENTS);
    prompt.push('\n');

    if !protein_suggestions.is_empty() {
        prompt.push_str(&format!(
            "\n- You may include these additional proteins: {}",
            protein_suggestions.join(", ")
        ));
    }

    if !diets.is_empty() {
        let names: Vec<&str> = diets.iter().map(AsRef::as_ref).collect();
        prompt.push_str("\n\n**DIETARY RESTRICTIONS - STRICTLY ENFORCE:**\n");
        prompt.push_str(&format!("- Follow these dietary preferences: {}\n", names.join(", ")));
        for rule in rules.iter() {
            prompt.push_str(&format!("- If {}: {}\n", rule.diet_name, rule.summary));
        }
    }

    if let Some(cuisine) = preference(cuisine_type) {
        prompt.push_str(&format!(
            "\n- Style: {} cuisine with authentic flavors and techniques",
            cuisine
        ));
    }

    if let Some(meal) = preference(meal_type) {
        prompt.push_str(&format!("\n- Meal type: {}", meal));
    }

    prompt.push_str(OUTPUT_FORMAT);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_minimal_prompt_has_fixed_sections_only() {
        let rules = DietaryRuleTable::builtin();
        let prompt = build_prompt::<&str>(&strings(&["rice", "leek"]), &[], None, None, &[], &rules);
        assert!(prompt.contains("using these ingredients: rice, leek"));
        assert!(prompt.contains("EXAMPLES OF THE QUALITY I EXPECT"));
        assert!(prompt.contains("REQUIREMENTS:"));
        assert!(prompt.contains("**JSON FORMAT:**"));
        assert!(!prompt.contains("DIETARY RESTRICTIONS"));
        assert!(!prompt.contains("additional proteins"));
        assert!(!prompt.contains("- Style:"));
        assert!(!prompt.contains("- Meal type:"));
    }

    #[test]
    fn test_optional_sections_in_order() {
        let rules = DietaryRuleTable::builtin();
        let prompt = build_prompt(
            &strings(&["rice"]),
            &["vegan", "keto"],
            Some("thai"),
            Some("dinner"),
            &strings(&["tofu", "tempeh"]),
            &rules,
        );
        let proteins = prompt.find("additional proteins: tofu, tempeh").unwrap();
        let diets = prompt.find("Follow these dietary preferences: vegan, keto").unwrap();
        let style = prompt.find("- Style: thai cuisine").unwrap();
        let meal = prompt.find("- Meal type: dinner").unwrap();
        let format = prompt.find("**JSON FORMAT:**").unwrap();
        assert!(proteins < diets && diets < style && style < meal && meal < format);
    }

    #[test]
    fn test_enforcement_lists_every_known_diet() {
        let rules = DietaryRuleTable::builtin();
        let prompt = build_prompt(&strings(&["rice"]), &["keto"], None, None, &[], &rules);
        let bullets: Vec<_> = ["vegetarian", "vegan", "gluten-free", "dairy-free"]
            .iter()
            .map(|diet| prompt.find(&format!("- If {}: ", diet)).unwrap())
            .collect();
        assert!(bullets.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(prompt.contains("- If gluten-free: NO wheat, barley, rye"));
        assert!(!prompt.contains("- If keto"));

        let prompt = build_prompt(&strings(&["rice"]), &["vegan"], None, None, &[], &rules);
        assert!(prompt.contains("- If gluten-free: "));
        assert!(prompt.contains("- If dairy-free: "));
    }

    #[test]
    fn test_any_suppresses_preference_sections() {
        let rules = DietaryRuleTable::builtin();
        let prompt = build_prompt::<&str>(&strings(&["rice"]), &[], Some("ANY"), Some("Any"), &[], &rules);
        assert!(!prompt.contains("- Style:"));
        assert!(!prompt.contains("- Meal type:"));
    }

    #[test]
    fn test_is_deterministic() {
        let rules = DietaryRuleTable::builtin();
        let build = || {
            build_prompt(
                &strings(&["rice", "tofu"]),
                &["vegan"],
                Some("indian"),
                None,
                &strings(&["lentils"]),
                &rules,
            )
        };
        assert_eq!(build(), build());
    }
}
