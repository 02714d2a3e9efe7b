//! Gemini `generateContent` client for category inference

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{InferredCategory, TraitInferrer, category_prompt, parse_category, truncate_excerpt};
use crate::config::InferenceConfig;

/// Gemini API request structures
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiRequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiRequestContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_mime_type: String,
}

/// Gemini API response structures
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

pub struct GeminiClient {
    agent: ureq::Agent,
    config: InferenceConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// A client without a key is allowed; every call then resolves to `Uncertain`
    pub fn new(config: InferenceConfig, api_key: Option<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self { agent, config, api_key }
    }

    fn build_request(&self, excerpt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiRequestContent {
                parts: vec![GeminiRequestPart {
                    text: category_prompt(truncate_excerpt(excerpt, self.config.excerpt_chars)),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    fn try_infer(&self, excerpt: &str) -> Result<InferredCategory> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| eyre::eyre!("No API key configured for category inference"))?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        let request_body =
            serde_json::to_string(&self.build_request(excerpt)).context("Failed to serialize request")?;

        let mut response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .send(request_body.as_bytes())
            .context("Failed to call Gemini API")?;

        let response_body = response
            .body_mut()
            .read_to_string()
            .context("Failed to read response")?;
        let response: GeminiResponse =
            serde_json::from_str(&response_body).context("Failed to parse Gemini response")?;

        let text = response
            .text()
            .ok_or_else(|| eyre::eyre!("No text in Gemini response"))?;

        Ok(parse_category(&text))
    }
}

impl TraitInferrer for GeminiClient {
    fn infer_category(&self, excerpt: &str) -> InferredCategory {
        match self.try_infer(excerpt) {
            Ok(category) => {
                log::info!("Inferred category: {}", category);
                category
            }
            Err(e) => {
                log::warn!("Category inference failed, using fallback: {:#}", e);
                InferredCategory::Uncertain
            }
        }
    }
}
