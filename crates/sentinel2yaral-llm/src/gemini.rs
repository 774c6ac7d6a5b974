//! Vertex AI Gemini client with region failover

use crate::{
    default_safety_settings, GenerationParams, LlmClient, LlmError, LlmResult, SafetySetting,
    AVAILABLE_MODELS, DEFAULT_REGIONS,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Minimum delay between full region sweeps
const RETRY_MIN_DELAY: Duration = Duration::from_secs(2);
/// Cap on the exponential backoff delay
const RETRY_MAX_DELAY: Duration = Duration::from_secs(10);

/// Gemini client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub project_id: String,
    pub regions: Vec<String>,
    pub model: String,
    pub access_token: Option<String>,
    pub timeout_seconds: u64,
    /// Total attempts of the full region sweep
    pub max_attempts: u32,
    /// Base URL replacing the per-region Vertex endpoint (tests)
    pub endpoint_override: Option<String>,
}

impl GeminiConfig {
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            model: AVAILABLE_MODELS[0].to_string(),
            access_token: None,
            timeout_seconds: 60,
            max_attempts: 3,
            endpoint_override: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_endpoint_override(mut self, base_url: &str) -> Self {
        self.endpoint_override = Some(base_url.to_string());
        self
    }
}

/// Vertex AI Gemini client.
///
/// Regions are tried strictly in configured order; the first success wins.
/// When every region fails the sweep is retried with exponential backoff
/// before surfacing the last region's error.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiClient {
    /// Create a new client, validating the configuration
    pub fn new(config: GeminiConfig) -> LlmResult<Self> {
        if config.project_id.is_empty() {
            return Err(LlmError::ConfigError(
                "Project ID must be provided or set in GCP_PROJECT environment variable"
                    .to_string(),
            ));
        }
        if config.regions.is_empty() {
            return Err(LlmError::ConfigError(
                "At least one region must be configured".to_string(),
            ));
        }
        if !AVAILABLE_MODELS.contains(&config.model.as_str()) {
            return Err(LlmError::ConfigError(format!(
                "Model {} not available. Choose from {:?}",
                config.model, AVAILABLE_MODELS
            )));
        }

        Ok(Self {
            config,
            client: Client::new(),
            safety_settings: default_safety_settings(),
        })
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Configured region order
    pub fn regions(&self) -> &[String] {
        &self.config.regions
    }

    fn region_url(&self, region: &str) -> String {
        let base = match &self.config.endpoint_override {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", region),
        };
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base, self.config.project_id, region, self.config.model
        )
    }

    fn access_token(&self) -> LlmResult<&str> {
        self.config
            .access_token
            .as_deref()
            .ok_or_else(|| LlmError::ConfigError("Access token required for Vertex AI".to_string()))
    }

    /// Try every region once, in order
    async fn sweep_regions(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> LlmResult<String> {
        let mut last_error: Option<LlmError> = None;

        for region in &self.config.regions {
            match self.generate_in_region(region, prompt, params).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(region = %region, "Error with region {}: {}", region, e);
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::AllRegionsFailed {
            last_error: Box::new(
                last_error
                    .unwrap_or_else(|| LlmError::ConfigError("No regions configured".to_string())),
            ),
        })
    }

    async fn generate_in_region(
        &self,
        region: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> LlmResult<String> {
        let token = self.access_token()?;
        let url = self.region_url(region);

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: WireGenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                max_output_tokens: params.max_output_tokens,
            },
            safety_settings: self.safety_settings.clone(),
        };

        debug!(region = %region, model = %self.config.model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status,
                message: text,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_candidate_text(parsed)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> LlmResult<String> {
        params.validate()?;

        let mut delay = RETRY_MIN_DELAY;
        let mut attempt = 1u32;

        loop {
            match self.sweep_regions(prompt, params).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt >= self.config.max_attempts => return Err(e),
                Err(e) => {
                    warn!(attempt, "Region sweep failed, retrying: {}", e);
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(RETRY_MAX_DELAY);
                    attempt += 1;
                }
            }
        }
    }

    async fn health_check(&self) -> LlmResult<bool> {
        // Vertex has no dedicated health endpoint; a minimal generation
        // request doubles as a connectivity and auth probe.
        let params = GenerationParams {
            max_output_tokens: 1000,
            ..GenerationParams::default()
        };

        match self.sweep_regions("Reply with OK.", &params).await {
            Ok(_) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

/// Pull the first candidate's concatenated text out of a response
fn extract_candidate_text(response: GenerateContentResponse) -> LlmResult<String> {
    let candidate = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    let parts = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default();

    let text: String = parts.into_iter().map(|part| part.text).collect();

    if text.is_empty() {
        return match candidate.finish_reason {
            Some(reason) if reason != "STOP" => Err(LlmError::BlockedResponse(reason)),
            _ => Err(LlmError::EmptyResponse),
        };
    }

    Ok(text)
}

/// Vertex generateContent request body
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: WireGenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f64,
    top_p: f64,
    max_output_tokens: u32,
}

/// Vertex generateContent response body (the fields we consume)
#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}
