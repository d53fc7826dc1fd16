use textchain::analyzer::llm_client::create_completion_client;
use textchain::error::ChainError;
use textchain::models::{FallbackReason, DEFAULT_CATEGORY_LABELS, DEFAULT_SENTIMENT_LABELS};
use textchain::{AnalysisRequest, ChainOrchestrator, LlmConfig};

#[test]
fn client_creation_fails_for_unsupported_model() {
    let config = LlmConfig::new("mystery-model").with_api_key(Some("test".to_string()));
    let result = create_completion_client(config);

    match result {
        Err(ChainError::LlmClientError(message)) => assert!(message.contains("mystery-model")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("unsupported model was accepted"),
    }
}

#[test]
fn client_creation_fails_without_credential() {
    for model in ["gpt-4o-mini", "claude-3-5-haiku-latest", "gemini-1.5-flash"] {
        let result = create_completion_client(LlmConfig::new(model));
        assert!(
            matches!(result, Err(ChainError::LlmClientError(_))),
            "{} accepted a missing key",
            model
        );
    }
}

#[test]
fn blank_credential_counts_as_missing() {
    let config = LlmConfig::new("gpt-4o-mini").with_api_key(Some("   ".to_string()));
    assert!(create_completion_client(config).is_err());
}

#[test]
fn compatible_endpoint_accepts_any_model_without_credential() {
    let config = LlmConfig::new("llama3").with_api_base(Some("http://localhost:11434/v1".to_string()));
    let client = create_completion_client(config).unwrap();

    assert_eq!(client.get_model_name(), "llama3");
}

#[test]
fn orchestrator_construction_propagates_client_errors() {
    let result = ChainOrchestrator::new(LlmConfig::new("mystery-model"), 5);
    assert!(matches!(result, Err(ChainError::LlmClientError(_))));
}

#[test]
fn orchestrator_repairs_requests_instead_of_rejecting() {
    let config = LlmConfig::new("llama3").with_api_base(Some("http://localhost:11434/v1".to_string()));
    let orchestrator = ChainOrchestrator::new(config, 5).unwrap();

    let request = AnalysisRequest::new("\n\t ")
        .with_category_labels(Vec::new())
        .with_sentiment_labels(Vec::new())
        .with_target_language("  ");
    let prepared = orchestrator.prepare_request(&request);

    assert_eq!(prepared.text, "\n\t ");
    assert_eq!(prepared.category_labels, DEFAULT_CATEGORY_LABELS.to_vec());
    assert_eq!(prepared.sentiment_labels, DEFAULT_SENTIMENT_LABELS.to_vec());
    assert!(prepared.target_language.is_none());

    let too_long = AnalysisRequest::new("a".repeat(400_004));
    assert_eq!(orchestrator.prepare_request(&too_long).text.len(), 400_004);
}

#[test]
fn error_messages_are_descriptive() {
    let status = ChainError::ProviderStatus {
        status: 429,
        message: "rate limited".to_string(),
    };
    assert_eq!(status.to_string(), "Completion endpoint returned 429: rate limited");

    assert_eq!(
        ChainError::InvalidArguments("bad".to_string()).to_string(),
        "Invalid arguments: bad"
    );
}

#[test]
fn io_and_json_errors_convert() {
    let io_error: ChainError =
        std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed").into();
    assert!(matches!(io_error, ChainError::IoError(_)));

    let json_error: ChainError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(json_error, ChainError::SerializationError(_)));
}

#[test]
fn fallback_reasons_describe_the_failure() {
    assert_eq!(
        FallbackReason::Timeout(30).to_string(),
        "completion call timed out after 30s"
    );
    assert!(FallbackReason::MissingField("Summary")
        .to_string()
        .contains("Summary"));
}
