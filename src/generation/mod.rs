pub mod request;
pub mod response;
pub mod service;

pub use request::{GenerationRequest, RecipeGenerationInput, ValidationError};
pub use response::{DietaryFiltering, GenerationInfo, GenerationResponse, RecipeSource};
pub use service::{check_diet, prompt_for, GenerationError, RecipeGenerator};
