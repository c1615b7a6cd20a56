use async_trait::async_trait;
use patentsmith_core::completion::{CompletionBackend, GenerationRequest, GenerationResult};
use patentsmith_interaction::{CompletionGateway, NO_CONTENT_TEXT, OpenAiCompatibleBackend, Sleeper};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn completion_body(content: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

fn backend(server: &MockServer) -> Arc<OpenAiCompatibleBackend> {
    Arc::new(OpenAiCompatibleBackend::new(format!("{}/v1/", server.uri()), "test-key", "test-model").unwrap())
}

#[tokio::test]
async fn test_backend_sends_chat_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [
                {"role": "system", "content": "be precise"},
                {"role": "user", "content": "describe a server rack"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("A rack."))))
        .expect(1)
        .mount(&server)
        .await;

    let request = GenerationRequest::new("describe a server rack", "be precise", 0.3);
    let text = backend(&server).complete(&request).await.unwrap();
    assert_eq!(text, "A rack.");
}

#[tokio::test]
async fn test_gateway_retries_rate_limit_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "Rate limited"}})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(json!("After retry"))))
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let gateway = CompletionGateway::new(backend(&server)).with_sleeper(sleeper.clone());
    let result = gateway.complete(&GenerationRequest::new("p", "s", 0.7)).await;

    assert_eq!(result, GenerationResult::Text("After retry".to_string()));
    assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_secs(2)]);
}

#[tokio::test]
async fn test_gateway_does_not_retry_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "Invalid API key"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let gateway = CompletionGateway::new(backend(&server)).with_sleeper(sleeper.clone());
    let result = gateway.complete(&GenerationRequest::new("p", "s", 0.7)).await;

    assert!(result.is_error());
    assert!(result.as_str().contains("HTTP 401"));
    assert!(sleeper.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_null_content_becomes_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(serde_json::Value::Null)))
        .mount(&server)
        .await;

    let gateway = CompletionGateway::new(backend(&server));
    let result = gateway.complete(&GenerationRequest::new("p", "s", 0.7)).await;

    assert_eq!(result, GenerationResult::Text(NO_CONTENT_TEXT.to_string()));
}
