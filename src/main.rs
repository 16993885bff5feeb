use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use recipe_gen::cli::{parse_args, read_batch_inputs, Command};
use recipe_gen::config::GenerationSettings;
use recipe_gen::dietary::rule_loader::load_diet_rules_csv;
use recipe_gen::dietary::{filter_ingredients, DietaryRuleTable};
use recipe_gen::generation::{check_diet, prompt_for, GenerationRequest, RecipeGenerator};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("recipe_gen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    let rules = match &cli.diet_rules {
        Some(path) => load_diet_rules_csv(path)
            .with_context(|| format!("Failed to load diet rules from '{}'", path.display()))?,
        None => DietaryRuleTable::builtin(),
    };
    let rules = Arc::new(rules);
    info!(diets = rules.len(), "Dietary rule table ready");

    match cli.command {
        Command::Generate {
            request,
            timeout_secs,
        } => {
            let request = GenerationRequest::validate(&request.read_input().await?)?;

            let mut settings = GenerationSettings::from_env()?;
            if let Some(secs) = timeout_secs {
                settings.request_timeout = Duration::from_secs(secs);
            }
            let generator = RecipeGenerator::from_env(rules, settings)
                .context("Recipe generation is not configured")?;

            print_json(&generator.generate(&request).await)?;
        }
        Command::Batch { request_file } => {
            let requests = read_batch_inputs(&request_file)
                .await?
                .iter()
                .enumerate()
                .map(|(index, input)| {
                    GenerationRequest::validate(input)
                        .with_context(|| format!("Request {} in batch is invalid", index))
                })
                .collect::<Result<Vec<_>>>()?;

            let generator = RecipeGenerator::from_env(rules, GenerationSettings::from_env()?)
                .context("Recipe generation is not configured")?;

            print_json(&generator.generate_batch(&requests).await)?;
        }
        Command::CheckDiet { request } => {
            let request = GenerationRequest::validate(&request.read_input().await?)?;
            print_json(&check_diet(&request, &rules))?;
        }
        Command::Prompt { request } => {
            let request = GenerationRequest::validate(&request.read_input().await?)?;
            let outcome = filter_ingredients(
                request.ingredients(),
                request.dietary_preferences(),
                &rules,
            );
            println!("{}", prompt_for(&request, &outcome, &rules));
        }
    }

    Ok(())
}
