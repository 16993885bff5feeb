use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

use super::rules::{DietRule, DietaryRuleTable};

const DIET_COL: &str = "diet";
const FORBIDDEN_COL: &str = "forbidden_ingredients";
const PROTEINS_COL: &str = "allowed_proteins";
const SUMMARY_COL: &str = "summary";

const LIST_SEPARATOR: char = '|';

fn split_list(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads a replacement rule table from a CSV file.
///
/// Expected headers: `diet,forbidden_ingredients,allowed_proteins,summary`,
/// with list cells separated by `|`. Rows without a diet name are skipped.
pub fn load_diet_rules_csv(csv_path: &Path) -> Result<DietaryRuleTable> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Diet rule file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open diet rule file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
    };
    let diet_idx = column(DIET_COL)?;
    let forbidden_idx = column(FORBIDDEN_COL)?;
    let proteins_idx = column(PROTEINS_COL)?;
    let summary_idx = column(SUMMARY_COL)?;

    let mut rules = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let diet_name = record.get(diet_idx).unwrap_or_default().trim().to_lowercase();
        if diet_name.is_empty() {
            continue;
        }

        rules.push(DietRule {
            diet_name,
            forbidden_substrings: split_list(record.get(forbidden_idx).unwrap_or_default())
                .into_iter()
                .map(|term| term.to_lowercase())
                .collect(),
            allowed_proteins: split_list(record.get(proteins_idx).unwrap_or_default()),
            summary: record.get(summary_idx).unwrap_or_default().trim().to_string(),
        });
    }

    if rules.is_empty() {
        return Err(anyhow::anyhow!("No valid diet rules loaded from {:?}", csv_path));
    }

    tracing::info!(count = rules.len(), path = ?csv_path, "Loaded diet rules");
    Ok(DietaryRuleTable::from_rules(rules))
}
