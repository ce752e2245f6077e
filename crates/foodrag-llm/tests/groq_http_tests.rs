mod common;

use common::serve_once;
use foodrag_core::config::{AppConfig, GroqConfig};
use foodrag_core::error::Error;
use foodrag_core::traits::ChatModel;
use foodrag_core::types::ChatMessage;
use foodrag_llm::GroqClient;

fn client_at(url: &str) -> anyhow::Result<GroqClient> {
    let mut app = AppConfig::default();
    app.llm.base_url = format!("{url}/openai/v1");
    Ok(GroqClient::new(&GroqConfig::with_api_key("gsk-test".to_string(), &app))?)
}

fn question() -> Vec<ChatMessage> {
    vec![ChatMessage::system("be brief"), ChatMessage::user("What is Biryani?")]
}

#[tokio::test]
async fn completion_content_is_trimmed_and_request_carries_sampling() -> anyhow::Result<()> {
    let (url, request) = serve_once(
        "200 OK",
        r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "\n Biryani is a rice dish. \n"}}]}"#,
    )
    .await?;

    let answer = client_at(&url)?.complete(&question()).await?;

    assert_eq!(answer, "Biryani is a rice dish.");
    let request = request.await?;
    assert!(request.head.starts_with("POST /openai/v1/chat/completions HTTP/1.1"));
    assert!(request.head.to_ascii_lowercase().contains("authorization: bearer gsk-test"));
    let body: serde_json::Value = serde_json::from_str(&request.body)?;
    assert_eq!(body["model"], "llama-3.1-8b-instant");
    assert_eq!(body["max_completion_tokens"], 1024);
    assert_eq!(body["stream"], false);
    assert_eq!(body["messages"][1]["content"], "What is Biryani?");
    Ok(())
}

#[tokio::test]
async fn empty_choices_are_malformed() -> anyhow::Result<()> {
    let (url, _request) = serve_once("200 OK", r#"{"choices": []}"#).await?;

    let err = client_at(&url)?.complete(&question()).await.expect_err("no choices");

    assert!(matches!(err, Error::MalformedResponse(_)));
    Ok(())
}

#[tokio::test]
async fn null_content_is_malformed() -> anyhow::Result<()> {
    let (url, _request) =
        serve_once("200 OK", r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#).await?;

    let err = client_at(&url)?.complete(&question()).await.expect_err("null content");

    assert!(matches!(err, Error::MalformedResponse(_)));
    Ok(())
}

#[tokio::test]
async fn unauthorized_reply_carries_the_error_message() -> anyhow::Result<()> {
    let (url, _request) = serve_once(
        "401 Unauthorized",
        r#"{"error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}}"#,
    )
    .await?;

    let err = client_at(&url)?.complete(&question()).await.expect_err("401");

    match err {
        Error::Api { service, status, message } => {
            assert_eq!(service, "Groq");
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid API Key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    Ok(())
}
