use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use futures_util::StreamExt;
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;

use persona_core::llm::provider::LlmProvider;
use persona_infra::llm::openai_compat::OpenAiCompatibleProvider;
use persona_infra::llm::openai_compat::config::OpenAiCompatConfig;
use persona_types::llm::{CompletionRequest, LlmError, Message, StopReason, StreamEvent};

const API_KEY: &str = "gsk-test-key";

const COMPLETION_BODY: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "created": 1700000000,
    "model": "llama-3.1-70b-versatile",
    "choices": [{
        "index": 0,
        "message": {"role": "assistant", "content": "Wubba lubba dub dub."},
        "finish_reason": "stop"
    }],
    "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
}"#;

const STREAM_BODY: &str = concat!(
    r#"data: {"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"llama-3.1-70b-versatile","choices":[{"index":0,"delta":{"role":"assistant","content":""},"finish_reason":null}]}"#,
    "\n\n",
    r#"data: {"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"llama-3.1-70b-versatile","choices":[{"index":0,"delta":{"content":"Wubba "},"finish_reason":null}]}"#,
    "\n\n",
    r#"data: {"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"llama-3.1-70b-versatile","choices":[{"index":0,"delta":{"content":"lubba"},"finish_reason":null}]}"#,
    "\n\n",
    r#"data: {"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"llama-3.1-70b-versatile","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
    "\n\n",
    r#"data: {"id":"chatcmpl-2","object":"chat.completion.chunk","created":1700000000,"model":"llama-3.1-70b-versatile","choices":[],"usage":{"prompt_tokens":42,"completion_tokens":2,"total_tokens":44}}"#,
    "\n\n",
    "data: [DONE]\n\n",
);

const INVALID_KEY_BODY: &str = r#"{
    "error": {
        "message": "Invalid API Key",
        "type": "invalid_request_error",
        "code": "invalid_api_key"
    }
}"#;

async fn chat_completions(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth != Some(format!("Bearer {API_KEY}").as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            [(header::CONTENT_TYPE, "application/json")],
            INVALID_KEY_BODY,
        )
            .into_response();
    }

    // The system prompt travels as the first message.
    if body["messages"][0]["role"] != "system" {
        return StatusCode::BAD_REQUEST.into_response();
    }

    if body["stream"] == true {
        if body["stream_options"]["include_usage"] != true {
            return StatusCode::BAD_REQUEST.into_response();
        }
        ([(header::CONTENT_TYPE, "text/event-stream")], STREAM_BODY).into_response()
    } else {
        ([(header::CONTENT_TYPE, "application/json")], COMPLETION_BODY).into_response()
    }
}

async fn start_server() -> String {
    let app = Router::new().route("/v1/chat/completions", post(chat_completions));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1")
}

fn provider(base_url: String, key: &str) -> OpenAiCompatibleProvider {
    OpenAiCompatibleProvider::new(OpenAiCompatConfig {
        provider_name: "groq".to_string(),
        base_url,
        api_key: SecretString::from(key.to_string()),
        model: "llama-3.1-70b-versatile".to_string(),
    })
}

fn request() -> CompletionRequest {
    CompletionRequest {
        model: String::new(),
        messages: vec![Message::user("Say your catchphrase.")],
        system: Some("You are Rick Sanchez.".to_string()),
        max_tokens: 256,
        temperature: Some(0.75),
        stream: false,
    }
}

async fn collect(provider: &OpenAiCompatibleProvider) -> Vec<Result<StreamEvent, LlmError>> {
    provider.stream(request()).collect().await
}

#[tokio::test]
async fn test_complete_returns_content_and_usage() {
    let base = start_server().await;
    let provider = provider(base, API_KEY);

    let response = provider.complete(&request()).await.unwrap();
    assert_eq!(response.id, "chatcmpl-1");
    assert_eq!(response.content, "Wubba lubba dub dub.");
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.input_tokens, 42);
    assert_eq!(response.usage.output_tokens, 7);
}

#[tokio::test]
async fn test_complete_with_rejected_key_is_authentication_failure() {
    let base = start_server().await;
    let provider = provider(base, "gsk-wrong");

    let err = provider.complete(&request()).await.unwrap_err();
    assert!(matches!(err, LlmError::AuthenticationFailed), "got {err:?}");
}

#[tokio::test]
async fn test_stream_emits_events_in_order() {
    let base = start_server().await;
    let provider = provider(base, API_KEY);

    let events: Vec<StreamEvent> = collect(&provider)
        .await
        .into_iter()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(events.len(), 6, "got {events:?}");
    assert!(matches!(events[0], StreamEvent::Connected));
    assert!(matches!(&events[1], StreamEvent::TextDelta { text } if text == "Wubba "));
    assert!(matches!(&events[2], StreamEvent::TextDelta { text } if text == "lubba"));
    assert!(matches!(
        events[3],
        StreamEvent::MessageDelta {
            stop_reason: StopReason::EndTurn
        }
    ));
    assert!(matches!(
        &events[4],
        StreamEvent::Usage(usage) if usage.input_tokens == 42 && usage.output_tokens == 2
    ));
    assert!(matches!(events[5], StreamEvent::Done));
}

#[tokio::test]
async fn test_stream_with_rejected_key_is_authentication_failure() {
    let base = start_server().await;
    let provider = provider(base, "gsk-wrong");

    let events = collect(&provider).await;
    let last = events.last().unwrap();
    assert!(matches!(last, Err(LlmError::AuthenticationFailed)), "got {events:?}");
    assert!(
        !events.iter().any(|e| matches!(e, Ok(StreamEvent::Done))),
        "a failed stream must not report Done"
    );
}
