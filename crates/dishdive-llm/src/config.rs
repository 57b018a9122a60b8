//! Model provider configuration (`llm-config.json` with env fallbacks).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{LLMProvider, ProviderTarget};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-20241022";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    #[serde(default = "default_preferred")]
    pub preferred_provider: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub groq_api_key: Option<String>,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,
    #[serde(default = "default_groq_model")]
    pub groq_model: String,
}

fn default_preferred() -> String {
    "auto".into()
}
fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.into()
}
fn default_anthropic_model() -> String {
    DEFAULT_ANTHROPIC_MODEL.into()
}
fn default_groq_model() -> String {
    DEFAULT_GROQ_MODEL.into()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            preferred_provider: default_preferred(),
            openai_api_key: None,
            anthropic_api_key: None,
            groq_api_key: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            groq_model: default_groq_model(),
        }
    }
}

impl LLMConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: LLMConfig = match std::fs::read_to_string(config_path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Ignoring invalid {}: {}", config_path.display(), e);
                LLMConfig::default()
            }),
            Err(_) => LLMConfig::default(),
        };

        if config.openai_api_key.is_none() {
            config.openai_api_key = non_empty_env("OPENAI_API_KEY");
        }
        if config.anthropic_api_key.is_none() {
            config.anthropic_api_key = non_empty_env("ANTHROPIC_API_KEY");
        }
        if config.groq_api_key.is_none() {
            config.groq_api_key = non_empty_env("GROQ_API_KEY");
        }
        if config.openai_model == DEFAULT_OPENAI_MODEL {
            if let Some(model) = non_empty_env("OPENAI_MODEL") {
                config.openai_model = model;
            }
        }

        match config.resolve_provider() {
            Some(target) => info!("Extraction model: {} / {}", target.provider, target.model),
            None => info!("No extraction model configured, rule-based extraction only"),
        }

        config
    }

    /// Resolve which provider and model to use. An explicit preference wins;
    /// otherwise the first provider with a key, in the order
    /// OpenAI, Anthropic, Groq.
    pub fn resolve_provider(&self) -> Option<ProviderTarget> {
        let target = |provider, model: &String, key: &Option<String>| {
            key.as_ref().map(|k| ProviderTarget {
                provider,
                model: model.clone(),
                api_key: k.clone(),
            })
        };

        match self.preferred_provider.as_str() {
            "openai" => target(LLMProvider::OpenAI, &self.openai_model, &self.openai_api_key),
            "anthropic" => target(
                LLMProvider::Anthropic,
                &self.anthropic_model,
                &self.anthropic_api_key,
            ),
            "groq" => target(LLMProvider::Groq, &self.groq_model, &self.groq_api_key),
            _ => target(LLMProvider::OpenAI, &self.openai_model, &self.openai_api_key)
                .or_else(|| {
                    target(
                        LLMProvider::Anthropic,
                        &self.anthropic_model,
                        &self.anthropic_api_key,
                    )
                })
                .or_else(|| target(LLMProvider::Groq, &self.groq_model, &self.groq_api_key)),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
