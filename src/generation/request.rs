use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_INGREDIENTS: usize = 30;
pub const MIN_INGREDIENT_CHARS: usize = 2;
pub const MAX_INGREDIENT_CHARS: usize = 100;
pub const MAX_DIETARY_PREFERENCES: usize = 10;

/// "No preference" for cuisine and meal type.
pub const ANY: &str = "any";

pub const VALID_DIETS: &[&str] = &[
    "vegetarian",
    "vegan",
    "gluten-free",
    "dairy-free",
    "nut-free",
    "low-carb",
    "keto",
    "paleo",
    "mediterranean",
    "halal",
    "kosher",
    "low-sodium",
    "low-fat",
    "high-protein",
    "diabetic-friendly",
];

pub const VALID_CUISINES: &[&str] = &[
    "italian",
    "chinese",
    "mexican",
    "indian",
    "french",
    "japanese",
    "thai",
    "american",
    "mediterranean",
    "greek",
    "spanish",
    "korean",
    "middle-eastern",
    "british",
    "german",
    "vietnamese",
    "turkish",
    "moroccan",
    "brazilian",
    "caribbean",
    "african",
    "fusion",
];

pub const VALID_MEAL_TYPES: &[&str] = &[
    "breakfast",
    "lunch",
    "dinner",
    "snack",
    "dessert",
    "appetizer",
    "main-course",
    "side-dish",
    "soup",
    "salad",
    "drink",
    "brunch",
];

/// A request rejected before it reaches the generation pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Request body as received, before any checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeGenerationInput {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary_preferences: Option<Vec<String>>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
}

/// A checked generation request. Only obtainable through [`GenerationRequest::validate`],
/// so every value is inside its vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    ingredients: Vec<String>,
    dietary_preferences: Vec<String>,
    cuisine_type: Option<String>,
    meal_type: Option<String>,
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_ingredient_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || "-'.()&,".contains(c)
}

fn clean_ingredients(raw: &[String]) -> Result<Vec<String>, ValidationError> {
    const FIELD: &str = "ingredients";
    if raw.is_empty() {
        return Err(ValidationError::new(FIELD, "At least one ingredient is required"));
    }
    if raw.len() > MAX_INGREDIENTS {
        return Err(ValidationError::new(
            FIELD,
            format!("At most {} ingredients are allowed", MAX_INGREDIENTS),
        ));
    }

    let mut cleaned: Vec<String> = Vec::with_capacity(raw.len());
    for ingredient in raw {
        let clean = collapse_whitespace(ingredient);
        let chars = clean.chars().count();
        if chars == 0 {
            return Err(ValidationError::new(FIELD, "Ingredient cannot be empty"));
        }
        if chars < MIN_INGREDIENT_CHARS {
            return Err(ValidationError::new(
                FIELD,
                "Ingredient name must be at least 2 characters long",
            ));
        }
        if chars > MAX_INGREDIENT_CHARS {
            return Err(ValidationError::new(
                FIELD,
                "Ingredient name cannot exceed 100 characters",
            ));
        }
        if !clean.chars().all(is_ingredient_char) {
            return Err(ValidationError::new(
                FIELD,
                format!("Invalid characters in ingredient: {}", clean),
            ));
        }
        if cleaned.contains(&clean) {
            return Err(ValidationError::new(FIELD, "Duplicate ingredients are not allowed"));
        }
        cleaned.push(clean);
    }
    Ok(cleaned)
}

fn clean_diets(raw: Option<&[String]>) -> Result<Vec<String>, ValidationError> {
    const FIELD: &str = "dietary_preferences";
    let raw = raw.unwrap_or_default();
    if raw.len() > MAX_DIETARY_PREFERENCES {
        return Err(ValidationError::new(
            FIELD,
            format!("At most {} dietary preferences are allowed", MAX_DIETARY_PREFERENCES),
        ));
    }

    let mut cleaned: Vec<String> = Vec::with_capacity(raw.len());
    for pref in raw {
        let clean = pref.trim().to_lowercase();
        if !VALID_DIETS.contains(&clean.as_str()) {
            return Err(ValidationError::new(
                FIELD,
                format!(
                    "Invalid dietary preference: {}. Valid options: {}",
                    pref,
                    VALID_DIETS.join(", ")
                ),
            ));
        }
        if !cleaned.contains(&clean) {
            cleaned.push(clean);
        }
    }
    Ok(cleaned)
}

fn clean_choice(
    field: &'static str,
    raw: Option<&str>,
    max_chars: usize,
    vocabulary: &[&str],
) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.chars().count() > max_chars {
        return Err(ValidationError::new(
            field,
            format!("Value cannot exceed {} characters", max_chars),
        ));
    }
    let clean = raw.trim().to_lowercase();
    if clean == ANY || vocabulary.contains(&clean.as_str()) {
        Ok(Some(clean))
    } else {
        Err(ValidationError::new(
            field,
            format!("Invalid {}: {}. Valid options: {}", field, raw, vocabulary.join(", ")),
        ))
    }
}

impl GenerationRequest {
    pub fn validate(input: &RecipeGenerationInput) -> Result<Self, ValidationError> {
        Ok(Self {
            ingredients: clean_ingredients(&input.ingredients)?,
            dietary_preferences: clean_diets(input.dietary_preferences.as_deref())?,
            cuisine_type: clean_choice(
                "cuisine_type",
                input.cuisine_type.as_deref(),
                50,
                VALID_CUISINES,
            )?,
            meal_type: clean_choice("meal_type", input.meal_type.as_deref(), 30, VALID_MEAL_TYPES)?,
        })
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn dietary_preferences(&self) -> &[String] {
        &self.dietary_preferences
    }

    pub fn cuisine_type(&self) -> Option<&str> {
        self.cuisine_type.as_deref()
    }

    pub fn meal_type(&self) -> Option<&str> {
        self.meal_type.as_deref()
    }
}
