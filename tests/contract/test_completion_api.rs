use mockito::{Matcher, Server};
use serde_json::json;
use textchain::analyzer::llm_client::create_completion_client;
use textchain::error::ChainError;
use textchain::models::CompletionQuery;
use textchain::LlmConfig;

fn compatible_config(base: &str) -> LlmConfig {
    LlmConfig::new("llama3")
        .with_api_key(Some("test-key".to_string()))
        .with_api_base(Some(base.to_string()))
        .with_timeout(30)
}

fn chat_completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1677652288,
        "model": "llama3",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": content
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 40,
            "completion_tokens": 8,
            "total_tokens": 48
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_completion_request_format() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama3",
            "temperature": 0.0,
            "messages": [{"role": "user", "content": "Detect the language of: Bonjour"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(r#"{"Language": "French"}"#))
        .expect(1)
        .create_async()
        .await;

    let client = create_completion_client(compatible_config(&server.url())).unwrap();
    let query = CompletionQuery::new("Detect the language of: Bonjour", "llama3");

    let reply = client.complete(&query).await.unwrap();

    assert_eq!(reply, r#"{"Language": "French"}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_configured_output_limit_is_forwarded() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"max_tokens": 8000})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body(r#"{"Translation": "long text"}"#))
        .expect(1)
        .create_async()
        .await;

    let config = compatible_config(&server.url()).with_max_tokens(Some(8000));
    let client = create_completion_client(config).unwrap();
    let reply = client
        .complete(&CompletionQuery::new("Translate this", "llama3"))
        .await
        .unwrap();

    assert_eq!(reply, r#"{"Translation": "long text"}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reply_is_returned_uninterpreted() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body("not json at all"))
        .create_async()
        .await;

    let client = create_completion_client(compatible_config(&server.url())).unwrap();
    let reply = client
        .complete(&CompletionQuery::new("prompt", "llama3"))
        .await
        .unwrap();

    assert_eq!(reply, "not json at all");
}

#[tokio::test]
async fn test_trailing_slash_in_api_base() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(chat_completion_body("ok"))
        .expect(1)
        .create_async()
        .await;

    let base = format!("{}/v1/", server.url());
    let client = create_completion_client(compatible_config(&base)).unwrap();
    let reply = client
        .complete(&CompletionQuery::new("prompt", "llama3"))
        .await
        .unwrap();

    assert_eq!(reply, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_status() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let client = create_completion_client(compatible_config(&server.url())).unwrap();
    let result = client
        .complete(&CompletionQuery::new("prompt", "llama3"))
        .await;

    match result {
        Err(ChainError::ProviderStatus { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected ProviderStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reply_without_choices() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": []}).to_string())
        .create_async()
        .await;

    let client = create_completion_client(compatible_config(&server.url())).unwrap();
    let result = client
        .complete(&CompletionQuery::new("prompt", "llama3"))
        .await;

    assert!(matches!(result, Err(ChainError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint() {
    let client = create_completion_client(compatible_config("http://127.0.0.1:9")).unwrap();
    let result = client
        .complete(&CompletionQuery::new("prompt", "llama3"))
        .await;

    assert!(matches!(result, Err(ChainError::NetworkError(_))));
}
