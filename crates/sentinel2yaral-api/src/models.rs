//! API data models

use sentinel2yaral_llm::GenerationParams;
use serde::{Deserialize, Serialize};

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Conversion request.
///
/// Exactly one of `rule_yaml` (inline/uploaded YAML) or `example`
/// (bundled example name) must be set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub rule_yaml: Option<String>,
    pub example: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f64>,
}

impl ConvertRequest {
    /// Generation parameters with request overrides applied
    pub fn generation_params(&self) -> GenerationParams {
        let defaults = GenerationParams::default();
        GenerationParams {
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_output_tokens: self
                .max_output_tokens
                .unwrap_or(defaults.max_output_tokens),
            top_p: self.top_p.unwrap_or(defaults.top_p),
        }
    }
}

/// Conversion response
#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub yaral_rule: String,
    pub model: String,
    pub request_id: String,
    /// Path the rule was persisted to, set only for example conversions
    pub saved_to: Option<String>,
}

/// Bundled example summary
#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleSummary {
    pub name: String,
    pub display_name: Option<String>,
    pub severity: Option<String>,
}

/// Example list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExamplesResponse {
    pub examples: Vec<ExampleSummary>,
    pub count: usize,
}

/// One example's full YAML
#[derive(Debug, Serialize, Deserialize)]
pub struct ExampleDetailResponse {
    pub name: String,
    pub yaml: String,
}

/// Model list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default_model: String,
    pub default_params: GenerationParams,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Error types for API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<sentinel2yaral_core::CoreError> for ApiError {
    fn from(err: sentinel2yaral_core::CoreError) -> Self {
        match err {
            sentinel2yaral_core::CoreError::YamlError(_)
            | sentinel2yaral_core::CoreError::InvalidRule(_)
            | sentinel2yaral_core::CoreError::UnknownExample(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
            sentinel2yaral_core::CoreError::IoError(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<sentinel2yaral_llm::LlmError> for ApiError {
    fn from(err: sentinel2yaral_llm::LlmError) -> Self {
        match err {
            sentinel2yaral_llm::LlmError::ConfigError(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
            _ => ApiError::ConversionError(err.to_string()),
        }
    }
}
