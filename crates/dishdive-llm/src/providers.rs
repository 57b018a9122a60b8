//! Non-streaming chat completions against OpenAI-compatible APIs and
//! Anthropic's Messages API.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::LLMConfig;
use crate::error::LlmError;
use crate::types::{CompletionRequest, LLMProvider, ProviderTarget};
use crate::CompletionModel;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP client bound to one resolved provider, or to none.
pub struct LlmClient {
    http: Client,
    target: Option<ProviderTarget>,
}

impl LlmClient {
    pub fn new(config: &LLMConfig, timeout: Duration) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            target: config.resolve_provider(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&ProviderTarget> {
        self.target.as_ref()
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let target = self.target.as_ref().ok_or(LlmError::NotConfigured)?;
        debug!("Completion request to {} with model {}", target.provider, target.model);

        let builder = self.http.post(target.provider.endpoint());
        let builder = match target.provider {
            LLMProvider::OpenAI | LLMProvider::Groq => builder
                .header("Authorization", format!("Bearer {}", target.api_key))
                .json(&openai_body(&target.model, request)),
            LLMProvider::Anthropic => builder
                .header("x-api-key", &target.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&anthropic_body(&target.model, request)),
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;
        let text = match target.provider {
            LLMProvider::OpenAI | LLMProvider::Groq => openai_content(&body),
            LLMProvider::Anthropic => anthropic_content(&body),
        }?;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

impl CompletionModel for LlmClient {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String, LlmError>> {
        Box::pin(self.send(request))
    }
}

fn openai_body(model: &str, request: &CompletionRequest) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            {"role": "system", "content": request.system},
            {"role": "user", "content": request.user},
        ],
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });
    if request.json_mode {
        body["response_format"] = json!({"type": "json_object"});
    }
    body
}

fn anthropic_body(model: &str, request: &CompletionRequest) -> Value {
    json!({
        "model": model,
        "system": request.system,
        "messages": [{"role": "user", "content": request.user}],
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    })
}

fn openai_content(body: &Value) -> Result<String, LlmError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LlmError::Decode("missing choices[0].message.content".into()))
}

fn anthropic_content(body: &Value) -> Result<String, LlmError> {
    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| LlmError::Decode("missing content blocks".into()))?;
    Ok(blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect::<Vec<_>>()
        .join(""))
}
