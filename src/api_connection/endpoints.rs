use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;

/// Models the generator is known to work with.
#[derive(Clone, Debug)]
pub struct GeminiAvailableModel {
    pub model_name: &'static str,
    pub description: &'static str,
}

pub const GEMINI_MODELS: &[GeminiAvailableModel] = &[
    GeminiAvailableModel {
        model_name: "gemini-1.5-flash",
        description: "fast text generation, default",
    },
    GeminiAvailableModel {
        model_name: "gemini-1.5-pro",
        description: "higher quality, slower",
    },
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl From<&SamplingConfig> for GenerationConfig {
    fn from(sampling: &SamplingConfig) -> Self {
        Self {
            temperature: sampling.temperature,
            max_output_tokens: sampling.max_output_tokens,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str, sampling: &SamplingConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(sampling.into()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Candidate {
    pub content: Content,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
    }

    /// The first candidate's finish reason when it is anything but `STOP`,
    /// e.g. `MAX_TOKENS` for a reply cut off mid-array.
    pub fn abnormal_finish(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .filter(|reason| *reason != "STOP")
    }
}

/// Looks up `name` in [`GEMINI_MODELS`].
pub fn find_model(name: &str) -> Option<&'static GeminiAvailableModel> {
    GEMINI_MODELS.iter().find(|model| model.model_name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = GenerateContentRequest::from_prompt("hi", &SamplingConfig::default());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert!(value["generationConfig"]["topP"].as_f64().unwrap() > 0.79);
    }

    #[test]
    fn test_first_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[]"}], "role": "model"}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("[]"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[test]
    fn test_abnormal_finish() {
        let stopped: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "["}]}, "finishReason": "MAX_TOKENS"}]
        }))
        .unwrap();
        assert_eq!(stopped.abnormal_finish(), Some("MAX_TOKENS"));

        let normal: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[]"}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(normal.abnormal_finish(), None);

        let unreported: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[]"}]}}]
        }))
        .unwrap();
        assert_eq!(unreported.abnormal_finish(), None);
    }

    #[test]
    fn test_find_model() {
        assert!(find_model("gemini-1.5-flash").is_some());
        assert!(find_model("gemini-1.5-pro").is_some());
        assert!(find_model("gpt-4o").is_none());
    }
}
