//! Chat Completions Provider
//!
//! `LlmProvider` implementation for any OpenAI-compatible
//! `/chat/completions` endpoint (OpenAI, llama.cpp server, vLLM, LM Studio).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use tomo::{ChatMessage, CompletionOptions, CompletionResponse, DomainError, LlmProvider, TokenUsage};

/// LLM provider over an OpenAI-compatible HTTP API
#[derive(Clone)]
pub struct ChatCompletionsProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct CompletionsRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<ApiUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl ChatCompletionsProvider {
    /// Create a provider for `base_url` (e.g. `https://api.openai.com/v1`)
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        }
    }
}

/// Map the wire response into the port's completion type.
fn into_completion_response(
    response: CompletionsResponse,
    fallback_model: &str,
) -> Result<CompletionResponse, DomainError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        DomainError::ExternalService("LLM returned no choices".to_string())
    })?;

    let content = choice.message.content.unwrap_or_default();
    let usage = response
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(CompletionResponse {
        content,
        model: response.model.unwrap_or_else(|| fallback_model.to_string()),
        usage,
        finish_reason: choice.finish_reason,
    })
}

#[async_trait]
impl LlmProvider for ChatCompletionsProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError> {
        let request = CompletionsRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            stop: options.stop_sequences.as_deref(),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("LLM request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "No response body".to_string());
            return Err(DomainError::ExternalService(format!(
                "LLM API error ({}): {}",
                status, body
            )));
        }

        let parsed: CompletionsResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("LLM response parse failed: {}", e)))?;

        into_completion_response(parsed, &self.model)
    }

    fn provider_name(&self) -> &str {
        "openai-compat"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_mapping() {
        let raw = r#"{
            "model": "test-model",
            "choices": [{"message": {"content": "hello there"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;
        let parsed: CompletionsResponse = serde_json::from_str(raw).unwrap();
        let completion = into_completion_response(parsed, "fallback").unwrap();

        assert_eq!(completion.content, "hello there");
        assert_eq!(completion.model, "test-model");
        assert_eq!(completion.usage.total_tokens, 15);
        assert_eq!(completion.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let parsed: CompletionsResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(into_completion_response(parsed, "fallback").is_err());
    }

    #[test]
    fn test_request_serializes_roles_lowercase() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let request = CompletionsRequest {
            model: "m",
            messages: &messages,
            max_tokens: Some(150),
            temperature: Some(0.9),
            top_p: Some(0.9),
            stop: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["role"], "user");
        assert!(value.get("stop").is_none());
    }
}
