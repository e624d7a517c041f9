//! HTTP-level tests for the chat-completions client.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::{AiClient, AiError, Message};

fn client_for(server: &MockServer) -> OpenAiClient {
    let config = OpenAiConfig::new("sk-test").with_base_url(format!("{}/v1", server.uri()));
    OpenAiClient::new(config).unwrap()
}

fn completion(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49 }
    })
}

#[tokio::test]
async fn sends_history_in_order_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 500,
            "messages": [
                { "role": "system", "content": "You are a tutor." },
                { "role": "user", "content": "Can you review my intro?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Sure, paste it here.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let messages = vec![
        Message::system("You are a tutor."),
        Message::user("Can you review my intro?"),
    ];
    let reply = client.send_message(&messages).await.unwrap();

    assert_eq!(reply.content, "Sure, paste it here.");
    assert_eq!(reply.usage.input_tokens, 42);
    assert_eq!(reply.usage.output_tokens, 7);
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&server)
        .await;

    let config = OpenAiConfig::new("sk-test").with_base_url(format!("{}/v1/", server.uri()));
    let client = OpenAiClient::new(config).unwrap();
    let reply = client.send_message(&[Message::user("hi")]).await.unwrap();
    assert_eq!(reply.content, "ok");
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_message(&[Message::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::RateLimited));
}

#[tokio::test]
async fn provider_error_message_is_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_message(&[Message::user("hi")])
        .await
        .unwrap_err();
    match err {
        AiError::ApiError(msg) => {
            assert!(msg.contains("401"), "got: {msg}");
            assert!(msg.contains("Incorrect API key provided"), "got: {msg}");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_choices_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_message(&[Message::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::ParseError(_)));
}

#[tokio::test]
async fn null_content_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .send_message(&[Message::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::ParseError(_)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = OpenAiConfig::new("sk-test")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_timeout(Duration::from_millis(50));
    let client = OpenAiClient::new(config).unwrap();

    let err = client.send_message(&[Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, AiError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let config = OpenAiConfig::new("sk-test").with_base_url("http://127.0.0.1:9/v1");
    let client = OpenAiClient::new(config).unwrap();

    let err = client.send_message(&[Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, AiError::NetworkError(_)), "got {err:?}");
}

#[test]
fn config_debug_redacts_key() {
    let config = OpenAiConfig::new("sk-very-secret").with_model("gpt-4o-mini");
    let debug = format!("{config:?}");
    assert!(!debug.contains("sk-very-secret"));
    assert!(debug.contains("gpt-4o-mini"));
}

#[test]
fn long_error_bodies_are_truncated() {
    let body = "x".repeat(1000);
    assert_eq!(OpenAiClient::describe_error_body(&body).len(), 200);
}
