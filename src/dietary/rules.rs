/// Restrictions attached to a single named diet.
#[derive(Debug, Clone, PartialEq)]
pub struct DietRule {
    pub diet_name: String,
    /// Lower-cased terms; an ingredient containing any of them is rejected.
    pub forbidden_substrings: Vec<String>,
    pub allowed_proteins: Vec<String>,
    /// Short restatement of what the diet excludes, used in prompts.
    pub summary: String,
}

impl DietRule {
    pub fn new(
        diet_name: &str,
        forbidden_substrings: &[&str],
        allowed_proteins: &[&str],
        summary: &str,
    ) -> Self {
        Self {
            diet_name: diet_name.to_lowercase(),
            forbidden_substrings: forbidden_substrings.iter().map(|s| s.to_lowercase()).collect(),
            allowed_proteins: allowed_proteins.iter().map(|s| s.to_string()).collect(),
            summary: summary.to_string(),
        }
    }

    /// Returns the first forbidden term contained in `ingredient`, ignoring case.
    pub fn forbidden_term_in(&self, ingredient: &str) -> Option<&str> {
        let lowered = ingredient.to_lowercase();
        self.forbidden_substrings
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }
}

const MEAT_AND_SEAFOOD: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "duck", "fish", "salmon", "tuna", "shrimp",
    "crab", "lobster", "meat", "bacon", "ham", "sausage", "pepperoni",
];

const ANIMAL_PRODUCTS: &[&str] = &["eggs", "milk", "cheese", "butter", "yogurt", "cream"];

/// Immutable lookup from lower-cased diet name to its rule. Rules keep
/// the order they were added in; a later rule with the same name replaces
/// the earlier one in place.
#[derive(Debug, Clone, Default)]
pub struct DietaryRuleTable {
    rules: Vec<DietRule>,
}

impl DietaryRuleTable {
    pub fn from_rules(rules: impl IntoIterator<Item = DietRule>) -> Self {
        let mut table = Self::default();
        for mut rule in rules {
            rule.diet_name = rule.diet_name.to_lowercase();
            match table.rules.iter_mut().find(|r| r.diet_name == rule.diet_name) {
                Some(existing) => *existing = rule,
                None => table.rules.push(rule),
            }
        }
        table
    }

    /// The rules the service ships with.
    pub fn builtin() -> Self {
        let vegan_forbidden: Vec<&str> = MEAT_AND_SEAFOOD
            .iter()
            .chain(ANIMAL_PRODUCTS.iter())
            .copied()
            .collect();

        Self::from_rules([
            DietRule::new(
                "vegetarian",
                MEAT_AND_SEAFOOD,
                &[
                    "tofu", "tempeh", "beans", "lentils", "chickpeas", "quinoa", "nuts", "seeds",
                    "eggs", "dairy",
                ],
                "NO meat, poultry, fish, or seafood",
            ),
            DietRule::new(
                "vegan",
                &vegan_forbidden,
                &[
                    "tofu",
                    "tempeh",
                    "beans",
                    "lentils",
                    "chickpeas",
                    "quinoa",
                    "nuts",
                    "seeds",
                    "nutritional yeast",
                ],
                "NO animal products (meat, dairy, eggs, honey, etc.)",
            ),
            DietRule::new(
                "gluten-free",
                &["wheat", "barley", "rye", "flour", "bread", "pasta", "noodles", "soy sauce"],
                &[],
                "NO wheat, barley, rye, or gluten-containing ingredients",
            ),
            DietRule::new(
                "dairy-free",
                &["milk", "cheese", "butter", "yogurt", "cream", "ice cream"],
                &[],
                "NO milk, cheese, butter, yogurt, or dairy products",
            ),
        ])
    }

    pub fn get(&self, diet: &str) -> Option<&DietRule> {
        let diet = diet.to_lowercase();
        self.rules.iter().find(|rule| rule.diet_name == diet)
    }

    /// All rules, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &DietRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First requested diet (in request order) whose rule forbids `ingredient`.
    pub fn first_violation<'a, S: AsRef<str>>(
        &'a self,
        ingredient: &str,
        diets: &[S],
    ) -> Option<&'a DietRule> {
        diets
            .iter()
            .filter_map(|diet| self.get(diet.as_ref()))
            .find(|rule| rule.forbidden_term_in(ingredient).is_some())
    }

    pub fn is_compliant<S: AsRef<str>>(&self, ingredient: &str, diets: &[S]) -> bool {
        self.first_violation(ingredient, diets).is_none()
    }
}
