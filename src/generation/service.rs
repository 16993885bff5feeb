use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use super::request::GenerationRequest;
use super::response::{DietaryFiltering, GenerationResponse, RecipeSource};
use crate::api_connection::endpoints::GenerateContentRequest;
use crate::api_connection::{ApiConnectionError, GeminiProvider};
use crate::config::{GenerationSettings, API_KEY_ENV_VAR};
use crate::dietary::{filter_ingredients, validate_recipes_against_diet, DietaryRuleTable, FilterOutcome};
use crate::fallback::fallback_recipes;
use crate::prompt_builder::build_prompt;
use crate::recipe::CandidateRecipe;
use crate::recipe_parser::parse_model_response;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Both model call paths failed (primary: {primary}; secondary: {secondary})")]
    ModelUnavailable {
        primary: ApiConnectionError,
        secondary: ApiConnectionError,
    },
}

/// Filter report for a request, without calling the model.
pub fn check_diet(request: &GenerationRequest, rules: &DietaryRuleTable) -> DietaryFiltering {
    let outcome = filter_ingredients(request.ingredients(), request.dietary_preferences(), rules);
    DietaryFiltering::from_outcome(&outcome, request.dietary_preferences())
}

/// The prompt a request turns into once its ingredients are filtered.
pub fn prompt_for(request: &GenerationRequest, outcome: &FilterOutcome, rules: &DietaryRuleTable) -> String {
    build_prompt(
        &outcome.allowed,
        request.dietary_preferences(),
        request.cuisine_type(),
        request.meal_type(),
        &outcome.protein_suggestions,
        rules,
    )
}

/// Runs the filter → prompt → model → parse → validate pipeline.
///
/// At most `max_concurrent_calls` generations are in flight at once; later
/// callers wait for a slot. Every failure past request validation degrades
/// to canned recipes, so generation itself never returns an error.
pub struct RecipeGenerator {
    provider: Arc<GeminiProvider>,
    rules: Arc<DietaryRuleTable>,
    settings: GenerationSettings,
    call_slots: Arc<Semaphore>,
    blocking_workers: Arc<Semaphore>,
}

impl RecipeGenerator {
    pub fn new(
        provider: GeminiProvider,
        rules: Arc<DietaryRuleTable>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            rules,
            call_slots: Arc::new(Semaphore::new(settings.max_concurrent_calls)),
            blocking_workers: Arc::new(Semaphore::new(settings.fallback_workers)),
            settings,
        }
    }

    /// Builds a generator whose provider reads `GEMINI_API_KEY`.
    pub fn from_env(
        rules: Arc<DietaryRuleTable>,
        settings: GenerationSettings,
    ) -> Result<Self, ApiConnectionError> {
        let provider = GeminiProvider::from_env(API_KEY_ENV_VAR, &settings)?;
        Ok(Self::new(provider, rules, settings))
    }

    pub fn rules(&self) -> &DietaryRuleTable {
        &self.rules
    }

    /// Free model-call slots right now.
    pub fn available_slots(&self) -> usize {
        self.call_slots.available_permits()
    }

    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResponse {
        let outcome = filter_ingredients(
            request.ingredients(),
            request.dietary_preferences(),
            &self.rules,
        );
        let (recipes, source) = self.generate_recipes(request, &outcome).await;
        GenerationResponse::assemble(request, &outcome, recipes, source)
    }

    /// One response per request, in request order. All of them share the
    /// same call slots.
    pub async fn generate_batch(&self, requests: &[GenerationRequest]) -> Vec<GenerationResponse> {
        info!(count = requests.len(), "Starting batch generation");
        let responses = join_all(requests.iter().map(|request| self.generate(request))).await;
        info!(count = responses.len(), "Completed batch generation");
        responses
    }

    fn fallback(&self, request: &GenerationRequest) -> Vec<CandidateRecipe> {
        info!("Generating fallback recipes");
        fallback_recipes(request.ingredients(), request.dietary_preferences(), &self.rules)
    }

    async fn generate_recipes(
        &self,
        request: &GenerationRequest,
        outcome: &FilterOutcome,
    ) -> (Vec<CandidateRecipe>, RecipeSource) {
        // Held until this function returns, on every path.
        let _slot = match self.call_slots.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("Model call limiter unavailable: {}", e);
                return (self.fallback(request), RecipeSource::Fallback);
            }
        };

        info!(
            model = self.provider.model_name(),
            ingredients = request.ingredients().len(),
            allowed = outcome.allowed.len(),
            "Starting recipe generation"
        );
        let prompt = prompt_for(request, outcome, &self.rules);

        match self.invoke_model(&prompt).await {
            Ok(candidates) => {
                let validated = validate_recipes_against_diet(
                    candidates,
                    request.dietary_preferences(),
                    &self.rules,
                );
                if validated.is_empty() {
                    warn!("Model produced no usable recipes");
                    (self.fallback(request), RecipeSource::Fallback)
                } else {
                    info!(count = validated.len(), "Generated recipes");
                    (validated, RecipeSource::Model)
                }
            }
            Err(e) => {
                error!("Model invocation failed: {}", e);
                (self.fallback(request), RecipeSource::Fallback)
            }
        }
    }

    async fn invoke_model(&self, prompt: &str) -> Result<Vec<CandidateRecipe>, GenerationError> {
        let request = GenerateContentRequest::from_prompt(prompt, &self.settings.sampling);

        let primary = match self
            .provider
            .generate_content(&request, self.settings.request_timeout)
            .await
        {
            Ok(text) => return Ok(parse_model_response(&text)),
            Err(e) => e,
        };
        warn!("Primary model call failed: {}; falling back to blocking call", primary);

        match self.call_blocking(request).await {
            Ok(text) => {
                info!("Blocking fallback call succeeded");
                Ok(parse_model_response(&text))
            }
            Err(secondary) => Err(GenerationError::ModelUnavailable { primary, secondary }),
        }
    }

    async fn call_blocking(&self, request: GenerateContentRequest) -> Result<String, ApiConnectionError> {
        let worker = Arc::clone(&self.blocking_workers)
            .acquire_owned()
            .await
            .map_err(|e| ApiConnectionError::WorkerFailed(e.to_string()))?;
        let provider = Arc::clone(&self.provider);
        let timeout = self.settings.fallback_timeout;

        tokio::task::spawn_blocking(move || {
            let _worker = worker;
            provider.generate_content_blocking(&request, timeout)
        })
        .await
        .map_err(|e| ApiConnectionError::WorkerFailed(e.to_string()))?
    }
}
