// Integration tests for sentinel2yaral components
// These tests verify end-to-end functionality across multiple crates

use sentinel2yaral_core::{
    clean_yaral_output, ConversionPrompt, RuleLibrary, MAX_REFERENCE_RULES,
};
use sentinel2yaral_llm::{GeminiClient, GeminiConfig, GenerationParams, LlmClient};
use std::collections::HashMap;
use std::sync::Arc;

const EXAMPLE_RULE: &str = "displayName: Failed logins\nseverity: Medium\nquery: SigninLogs | where ResultType != 0\n";

fn write_rules_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("failed_logins.yaml"), EXAMPLE_RULE).unwrap();
    std::fs::write(
        dir.path().join("rule_reference.yaral"),
        "rule reference {\n  meta:\n  condition:\n    $e\n}\n",
    )
    .unwrap();
    dir
}

fn region_path(region: &str) -> String {
    format!(
        "/v1/projects/test-project/locations/{}/publishers/google/models/gemini-2.0-flash-001:generateContent",
        region
    )
}

fn candidate_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::new(
        GeminiConfig::new("test-project")
            .with_access_token("test-token")
            .with_regions(vec!["us-central1".to_string(), "us-east4".to_string()])
            .with_max_attempts(1)
            .with_endpoint_override(base_url),
    )
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_conversion_flow() {
    let dir = write_rules_dir();
    let library = RuleLibrary::load(dir.path()).unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", region_path("us-central1").as_str())
        // The prompt must embed both the reference YARA-L rule and the
        // Sentinel rule's query
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex("rule reference".to_string()),
            mockito::Matcher::Regex("SigninLogs".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("```yaral\nrule converted {}\n```"))
        .create_async()
        .await;

    let client = test_client(&server.url());
    let rule = library.get_required("failed_logins.yaml").unwrap();
    let prompt = ConversionPrompt::new(rule)
        .with_references(library.reference_rules(MAX_REFERENCE_RULES))
        .build()
        .unwrap();

    let raw = client
        .generate(&prompt, &GenerationParams::default())
        .await
        .unwrap();
    let yaral = clean_yaral_output(&raw);
    assert_eq!(yaral, "rule converted {}");

    let saved = library.save_converted("failed_logins.yaml", &yaral).unwrap();
    assert_eq!(
        std::fs::read_to_string(saved).unwrap(),
        "rule converted {}"
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_region_failover_across_crates() {
    let dir = write_rules_dir();
    let library = RuleLibrary::load(dir.path()).unwrap();

    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("POST", region_path("us-central1").as_str())
        .with_status(500)
        .with_body("region down")
        .create_async()
        .await;
    let second = server
        .mock("POST", region_path("us-east4").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("rule failover {}"))
        .create_async()
        .await;

    let client = test_client(&server.url());
    let rule = library.get_required("failed_logins.yaml").unwrap();
    let prompt = ConversionPrompt::new(rule)
        .with_references(library.reference_rules(MAX_REFERENCE_RULES))
        .build()
        .unwrap();

    let raw = client
        .generate(&prompt, &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(clean_yaral_output(&raw), "rule failover {}");
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_api_convert_against_live_client() {
    use axum::extract::{Extension, Json};
    use sentinel2yaral_api::models::ConvertRequest;
    use sentinel2yaral_api::{handlers, AppState};
    use sentinel2yaral_observability::ConverterMonitor;
    use std::time::Instant;

    let dir = write_rules_dir();
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", region_path("us-central1").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body("rule api {}"))
        .create_async()
        .await;

    let mut clients: HashMap<String, Arc<dyn LlmClient>> = HashMap::new();
    clients.insert(
        "gemini-2.0-flash-001".to_string(),
        Arc::new(test_client(&server.url())),
    );

    let state = Arc::new(AppState {
        clients,
        default_model: "gemini-2.0-flash-001".to_string(),
        library: Arc::new(RuleLibrary::load(dir.path()).unwrap()),
        monitoring: Arc::new(ConverterMonitor::new()),
        start_time: Instant::now(),
    });

    let request = ConvertRequest {
        example: Some("failed_logins.yaml".to_string()),
        ..ConvertRequest::default()
    };

    let Json(response) = handlers::convert(Extension(state), Json(request))
        .await
        .expect("conversion should succeed");
    let converted = response.data.unwrap();

    assert_eq!(converted.yaral_rule, "rule api {}");
    assert!(dir.path().join("failed_logins.yaral").exists());
}
