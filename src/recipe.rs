use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Title given to recipes the model left unnamed.
pub const PLACEHOLDER_TITLE: &str = "Generated Recipe";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeIngredient {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: String,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.into(),
        }
    }
}

/// A recipe produced by the generation pipeline that has not been stored yet.
///
/// Model output is loosely shaped: every field may be missing or null,
/// numbers may stand in for strings and instructions may be a list. An
/// unnamed recipe gets [`PLACEHOLDER_TITLE`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CandidateRecipe {
    #[serde(default = "placeholder_title", deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_instructions")]
    pub instructions: String,
    #[serde(default, deserialize_with = "lenient_ingredients")]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub prep_time: Option<u32>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub cook_time: Option<u32>,
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub servings: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty: String,
}

fn placeholder_title() -> String {
    PLACEHOLDER_TITLE.to_string()
}

fn lenient_title<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = lenient_string(deserializer)?;
    let title = title.trim();
    Ok(if title.is_empty() {
        placeholder_title()
    } else {
        title.to_string()
    })
}

// null means no ingredients; bare strings are names; other junk entries are skipped.
fn lenient_ingredients<'de, D>(deserializer: D) -> Result<Vec<RecipeIngredient>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(RecipeIngredient::new(name, "", "")),
            Value::Object(_) => serde_json::from_value(item).ok(),
            _ => None,
        })
        .collect())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

// Models return either one block of text or a list of steps.
fn lenient_instructions<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Array(steps) => steps
            .iter()
            .filter_map(|step| step.as_str())
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    })
}

// "25", 25 and "25 minutes" all mean 25; anything else is dropped.
fn lenient_minutes<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s
            .split_whitespace()
            .next()
            .and_then(|first| first.parse::<u32>().ok()),
        _ => None,
    })
}
