//! Gemini API client
//!
//! Single outbound integration point for both the insight analysis
//! (structured JSON output) and the chat assistant (free text).
//! Uses a long-lived reqwest::Client for connection pooling.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::error::InsightError;

/// Seam over the generative model so consumers can be tested without a
/// network. `GeminiClient` is the production implementation.
#[async_trait::async_trait]
pub trait TextModel: Send + Sync {
    /// Free-text generation with a system instruction.
    async fn generate_text(&self, prompt: &str, system_instruction: &str) -> crate::Result<String>;

    /// JSON generation constrained by a response schema.
    async fn generate_structured(
        &self,
        prompt: &str,
        system_instruction: &str,
        schema: serde_json::Value,
    ) -> crate::Result<serde_json::Value>;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
        }
    }

    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        schema: Option<serde_json::Value>,
    ) -> crate::Result<String> {
        if self.api_key.is_empty() {
            return Err(InsightError::ConfigError(
                "GEMINI_API_KEY not configured".to_string(),
            ));
        }

        let url = format!("{}?key={}", self.base_url, self.api_key);

        let structured = schema.is_some();
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1024,
                response_mime_type: structured.then(|| "application/json".to_string()),
                response_schema: schema,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
        };

        info!(structured, "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e);
                InsightError::ModelError(format!("Gemini API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", error_text);
            return Err(InsightError::ModelError(format!(
                "Gemini API error: {}",
                error_text
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            InsightError::MalformedResponse(format!("Gemini parse error: {}", e))
        })?;

        let answer = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| {
                InsightError::MalformedResponse("Empty response from Gemini".to_string())
            })?;

        info!("Gemini response received ({} chars)", answer.len());

        Ok(answer)
    }
}

#[async_trait::async_trait]
impl TextModel for GeminiClient {
    async fn generate_text(&self, prompt: &str, system_instruction: &str) -> crate::Result<String> {
        self.generate(prompt, system_instruction, None).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        system_instruction: &str,
        schema: serde_json::Value,
    ) -> crate::Result<serde_json::Value> {
        let raw = self.generate(prompt, system_instruction, Some(schema)).await?;
        parse_json_response(&raw)
    }
}

/// Parse a model reply that should be JSON, tolerating markdown fences.
/// Even in JSON mode some models wrap the payload in ```json ... ```.
pub fn parse_json_response(response: &str) -> crate::Result<serde_json::Value> {
    let cleaned = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned).map_err(|e| {
        InsightError::MalformedResponse(format!(
            "Failed to parse Gemini JSON response: {} | raw={}",
            e, response
        ))
    })
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: i32,
    max_output_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}
