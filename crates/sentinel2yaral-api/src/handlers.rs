//! API request handlers

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as JsonResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::models::*;
use sentinel2yaral_core::{clean_yaral_output, ConversionPrompt, RuleLibrary, SentinelRule, MAX_REFERENCE_RULES};
use sentinel2yaral_llm::{GenerationParams, LlmClient};
use sentinel2yaral_observability::ConverterMonitor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// One client per selectable model
    pub clients: HashMap<String, Arc<dyn LlmClient>>,
    pub default_model: String,
    pub library: Arc<RuleLibrary>,
    pub monitoring: Arc<ConverterMonitor>,
    pub start_time: Instant,
}

impl AppState {
    fn client_for(&self, model: &str) -> Result<&Arc<dyn LlmClient>, ApiError> {
        self.clients.get(model).ok_or_else(|| {
            ApiError::InvalidRequest(format!(
                "Model {} not available. Choose from {:?}",
                model,
                self.clients.keys().collect::<Vec<_>>()
            ))
        })
    }
}

/// Health check handler
pub async fn health_check(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResponse<ApiResponse<HealthResponse>> {
    let uptime = state.start_time.elapsed();

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.as_secs(),
    };

    JsonResponse(ApiResponse::success(response))
}

/// List bundled example rules
pub async fn list_examples(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResponse<ApiResponse<ExamplesResponse>> {
    let examples: Vec<ExampleSummary> = state
        .library
        .rule_names()
        .into_iter()
        .filter_map(|name| {
            let rule = state.library.get(&name)?;
            Some(ExampleSummary {
                display_name: rule.display_name().map(String::from),
                severity: rule.severity().map(String::from),
                name,
            })
        })
        .collect();

    let count = examples.len();
    JsonResponse(ApiResponse::success(ExamplesResponse { examples, count }))
}

/// Fetch one bundled example's YAML
pub async fn get_example(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<JsonResponse<ApiResponse<ExampleDetailResponse>>, (StatusCode, JsonResponse<ApiResponse<String>>)>
{
    let result = state
        .library
        .get_required(&name)
        .map_err(ApiError::from)
        .and_then(|rule| rule.to_yaml_string().map_err(ApiError::from));

    match result {
        Ok(yaml) => Ok(JsonResponse(ApiResponse::success(ExampleDetailResponse {
            name,
            yaml,
        }))),
        Err(e) => Err(error_response(e)),
    }
}

/// List available models and default generation parameters
pub async fn list_models(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResponse<ApiResponse<ModelsResponse>> {
    let mut models: Vec<String> = state.clients.keys().cloned().collect();
    models.sort();

    JsonResponse(ApiResponse::success(ModelsResponse {
        models,
        default_model: state.default_model.clone(),
        default_params: GenerationParams::default(),
    }))
}

/// Convert a Sentinel rule to YARA-L
pub async fn convert(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ConvertRequest>,
) -> Result<JsonResponse<ApiResponse<ConvertResponse>>, (StatusCode, JsonResponse<ApiResponse<String>>)>
{
    match run_conversion(&state, request).await {
        Ok(response) => {
            state.monitoring.record_conversion(true);
            Ok(JsonResponse(ApiResponse::success(response)))
        }
        Err(e) => {
            state.monitoring.record_conversion(false);
            Err(error_response(e))
        }
    }
}

async fn run_conversion(
    state: &AppState,
    request: ConvertRequest,
) -> Result<ConvertResponse, ApiError> {
    let (rule, example_name) = match (&request.rule_yaml, &request.example) {
        (Some(yaml), None) => (SentinelRule::from_yaml_str(yaml)?, None),
        (None, Some(name)) => (
            state.library.get_required(name)?.clone(),
            Some(name.clone()),
        ),
        _ => {
            return Err(ApiError::InvalidRequest(
                "Provide exactly one of rule_yaml or example".to_string(),
            ))
        }
    };

    let model = request
        .model
        .clone()
        .unwrap_or_else(|| state.default_model.clone());
    let client = state.client_for(&model)?;

    let params = request.generation_params();
    let prompt = ConversionPrompt::new(&rule)
        .with_references(state.library.reference_rules(MAX_REFERENCE_RULES))
        .build()?;

    let request_id = uuid::Uuid::new_v4().to_string();
    info!(request_id = %request_id, model = %model, "Converting rule");

    let raw = client.generate(&prompt, &params).await?;
    let yaral_rule = clean_yaral_output(&raw);

    // Converting a bundled example persists the result alongside it;
    // uploaded rules are never written server-side.
    let saved_to = match example_name {
        Some(name) => match state.library.save_converted(&name, &yaral_rule) {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!(example = %name, "Failed to persist converted rule: {}", e);
                None
            }
        },
        None => None,
    };

    Ok(ConvertResponse {
        yaral_rule,
        model,
        request_id,
        saved_to,
    })
}

fn error_response(e: ApiError) -> (StatusCode, JsonResponse<ApiResponse<String>>) {
    let status = match &e {
        ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ApiError::ConversionError(_) => StatusCode::BAD_GATEWAY,
        ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, JsonResponse(ApiResponse::error(e.to_string())))
}
