//! LLM統合モジュール
//!
//! このクレートはVertex AI経由でホストされるGeminiモデルとの統合を提供します:
//! - リージョンフェイルオーバー付きgenerateContentクライアント
//! - 生成パラメータとセーフティ設定
//!
//! Translation semantics live entirely in the hosted model; this crate is
//! the wire plumbing around one REST call.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};

use serde::{Deserialize, Serialize};

/// Gemini models exposed to users, first entry is the default
pub const AVAILABLE_MODELS: [&str; 3] = [
    "gemini-2.0-flash-001",
    "gemini-1.5-pro-002",
    "gemini-1.5-flash-002",
];

/// Vertex AI regions tried in order until one succeeds
pub const DEFAULT_REGIONS: [&str; 6] = [
    "us-central1",
    "us-east4",
    "us-west1",
    "europe-west1",
    "europe-west4",
    "asia-northeast1",
];

/// Generation parameters for a conversion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_output_tokens: u32,
    pub top_p: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 8192,
            top_p: 0.95,
        }
    }
}

impl GenerationParams {
    /// Range-check the parameters before any network call
    pub fn validate(&self) -> LlmResult<()> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(LlmError::ConfigError(
                "temperature must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(1000..=8192).contains(&self.max_output_tokens) {
            return Err(LlmError::ConfigError(
                "max_output_tokens must be between 1000 and 8192".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(LlmError::ConfigError(
                "top_p must be between 0.0 and 1.0".to_string(),
            ));
        }
        Ok(())
    }
}

/// One safety setting entry sent with every request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// Safety settings applied to every generation request.
///
/// Detection-rule text trips medium-level filters too easily, so all four
/// harm categories block only high-confidence matches.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_HARASSMENT",
    ]
    .iter()
    .map(|category| SafetySetting {
        category: category.to_string(),
        threshold: "BLOCK_ONLY_HIGH".to_string(),
    })
    .collect()
}

/// LLM client trait
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text for a prompt with the given parameters
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> LlmResult<String>;

    /// Health check against the backing model endpoint
    async fn health_check(&self) -> LlmResult<bool>;
}

/// LLM operation result type
pub type LlmResult<T> = Result<T, LlmError>;

/// LLM error types
#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Model returned no usable candidate text")]
    EmptyResponse,

    #[error("Response blocked by the model: {0}")]
    BlockedResponse(String),

    #[error("All regions failed. Last error: {last_error}")]
    AllRegionsFailed { last_error: Box<LlmError> },
}
