use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::fs;

use crate::generation::RecipeGenerationInput;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate diet-aware recipes with a generative model", long_about = None)]
pub struct Cli {
    /// CSV file replacing the built-in diet rules
    #[arg(long, env = "RECIPE_DIET_RULES", global = true)]
    pub diet_rules: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// JSON file holding a generation request; takes precedence over the flags below
    #[arg(short, long)]
    pub request_file: Option<PathBuf>,

    /// Available ingredient (repeatable)
    #[arg(short, long = "ingredient")]
    pub ingredients: Vec<String>,

    /// Dietary preference, e.g. vegan (repeatable)
    #[arg(short, long = "diet")]
    pub diets: Vec<String>,

    #[arg(short, long)]
    pub cuisine: Option<String>,

    #[arg(short, long)]
    pub meal_type: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate recipes from a set of ingredients
    Generate {
        #[command(flatten)]
        request: RequestArgs,

        /// Overrides RECIPE_REQUEST_TIMEOUT_SECS for the primary model call
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Generate recipes for every request in a JSON array file
    Batch {
        #[arg(short, long)]
        request_file: PathBuf,
    },
    /// Report which ingredients conflict with the requested diets
    CheckDiet {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Print the prompt a request would send to the model
    Prompt {
        #[command(flatten)]
        request: RequestArgs,
    },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

impl RequestArgs {
    fn to_input(&self) -> RecipeGenerationInput {
        RecipeGenerationInput {
            ingredients: self.ingredients.clone(),
            dietary_preferences: Some(self.diets.clone()),
            cuisine_type: self.cuisine.clone(),
            meal_type: self.meal_type.clone(),
        }
    }

    /// The raw request, from the request file if one was given.
    pub async fn read_input(&self) -> Result<RecipeGenerationInput> {
        match &self.request_file {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read request file '{}'", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Request file '{}' is not a valid request", path.display()))
            }
            None => Ok(self.to_input()),
        }
    }
}

pub async fn read_batch_inputs(path: &Path) -> Result<Vec<RecipeGenerationInput>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read batch file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Batch file '{}' is not a JSON array of requests", path.display()))
}
