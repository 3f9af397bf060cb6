use std::time::Duration;

use healthai_core::llm::{ChatError, ModelClient, PERSONA};
use httpmock::prelude::*;
use providers::openrouter::{Credential, OpenRouterClient, OpenRouterConfig};
use serde_json::json;

fn client_for(base_url: String) -> OpenRouterClient {
    let mut cfg = OpenRouterConfig::new(Credential::new("test-key"));
    cfg.base_url = base_url;
    cfg.model = "test/model".to_string();
    OpenRouterClient::new(cfg).unwrap()
}

fn reply(content: &str) -> serde_json::Value {
    json!({
        "id": "gen-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn sends_one_post_with_persona_and_prompt() {
    let server = MockServer::start_async().await;

    for prompt in ["What helps a migraine?", "it's \"quoted\"\nand multi-line", "ça va? 頭痛"] {
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "model": "test/model",
                        "messages": [
                            {"role": "system", "content": PERSONA},
                            {"role": "user", "content": prompt}
                        ]
                    }));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(reply("ok"));
            })
            .await;

        let client = client_for(server.base_url());
        assert_eq!(client.complete(prompt).await.unwrap(), "ok");
        mock.assert_async().await;
        mock.delete_async().await;
    }
}

#[tokio::test]
async fn returns_first_choice_content_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices":[{"message":{"content":"X"}}]}"#);
        })
        .await;

    let client = client_for(server.base_url());
    assert_eq!(client.complete("hi").await.unwrap(), "X");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(reply("fine"));
        })
        .await;

    let client = client_for(format!("{}/", server.base_url()));
    assert_eq!(client.complete("hi").await.unwrap(), "fine");
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_surfaces_status_and_raw_body() {
    let server = MockServer::start_async().await;

    for (status, body) in [
        (401u16, r#"{"error":{"message":"No auth credentials found","code":401}}"#),
        (429, "rate limited"),
        (503, ""),
        (201, r#"{"choices":[{"message":{"content":"X"}}]}"#),
    ] {
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(status).body(body);
            })
            .await;

        let client = client_for(server.base_url());
        let err = client.complete("hi").await.unwrap_err();
        assert_eq!(
            err,
            ChatError::Upstream {
                status,
                body: body.to_string()
            }
        );
        let shown = err.to_string();
        assert!(shown.contains(&status.to_string()));
        assert!(shown.contains(body));
        mock.assert_async().await;
        mock.delete_async().await;
    }
}

#[tokio::test]
async fn malformed_success_body_is_an_error() {
    let server = MockServer::start_async().await;

    for body in [r#"{"choices":[]}"#, r#"{"object":"chat.completion"}"#, "<html>oops</html>"] {
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).body(body);
            })
            .await;

        let client = client_for(server.base_url());
        let err = client.complete("hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Malformed(_)), "{body}: {err:?}");
        mock.delete_async().await;
    }
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let client = client_for("http://127.0.0.1:65534".to_string());
    let err = client.complete("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn slow_upstream_hits_the_timeout() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(reply("late"));
        })
        .await;

    let mut cfg = OpenRouterConfig::new(Credential::new("test-key"));
    cfg.base_url = server.base_url();
    cfg.timeout = Duration::from_millis(200);
    let client = OpenRouterClient::new(cfg).unwrap();
    let err = client.complete("hi").await.unwrap_err();
    assert!(matches!(err, ChatError::Timeout(_)), "{err:?}");
}

#[test]
fn credential_with_newline_is_rejected_at_construction() {
    let cfg = OpenRouterConfig::new(Credential::new("bad\nkey"));
    assert!(matches!(
        OpenRouterClient::new(cfg),
        Err(ChatError::Config(_))
    ));
}
