use reqwest::Client;

use foodrag_core::config::GroqConfig;
use foodrag_core::error::{Error, Result};
use foodrag_core::traits::ChatModel;
use foodrag_core::types::ChatMessage;

use crate::wire::{ChatCompletionRequest, ChatCompletionResponse, ErrorResponse};

const SERVICE: &str = "Groq";

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    config: GroqConfig,
}

impl GroqClient {
    pub fn new(config: &GroqConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::http(SERVICE, e))?;
        Ok(Self { client, config: config.clone() })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

impl ChatModel for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_completion_tokens: self.config.max_completion_tokens,
            top_p: self.config.top_p,
            stream: false,
        };
        tracing::debug!(model = %self.config.model, messages = messages.len(), "chat completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Groq API request failed: {}", e);
                Error::http(SERVICE, e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            tracing::error!("Groq API error: {} - {}", status, message);
            return Err(Error::Api { service: SERVICE, status: status.as_u16(), message });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Groq response: {}", e);
            Error::malformed(format!("chat completion: {e}"))
        })?;

        completion
            .first_content()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| Error::malformed("chat completion has no message content"))
    }
}
