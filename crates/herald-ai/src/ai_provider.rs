use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::providers::{
    anthropic::AnthropicProvider, ollama::OllamaProvider, openai::OpenAiProvider,
};

/// Trait for text-generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt` under the given system directive
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

/// Supported text-generation services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Anthropic,
    Ollama,
}

impl AiProvider {
    #[must_use]
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-5",
            Self::Anthropic => "claude-sonnet-4-5",
            Self::Ollama => "llama3.1",
        }
    }

    /// Environment variable holding the API key, if the service needs one
    #[must_use]
    pub fn api_key_env(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama => None,
        }
    }
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
        };
        f.write_str(name)
    }
}

impl FromStr for AiProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            other => anyhow::bail!("Unknown AI provider: {other} (expected openai, anthropic or ollama)"),
        }
    }
}

/// Resolved settings for one text-generation backend
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl AiConfig {
    #[must_use]
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns an error if the API key is missing for providers that require one
/// (`OpenAI`, Anthropic), or if the HTTP client cannot be built.
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn TextGenerator>> {
    let model = config.effective_model();
    let base_url = config.base_url.as_deref();

    match config.provider {
        AiProvider::OpenAi => {
            let api_key = config
                .api_key
                .as_deref()
                .context("API Key required for OpenAI (set OPENAI_API_KEY)")?;
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                model,
                base_url,
                config.timeout,
            )?))
        }
        AiProvider::Anthropic => {
            let api_key = config
                .api_key
                .as_deref()
                .context("API Key required for Anthropic (set ANTHROPIC_API_KEY)")?;
            Ok(Box::new(AnthropicProvider::new(
                api_key,
                model,
                base_url,
                config.timeout,
            )?))
        }
        AiProvider::Ollama => Ok(Box::new(OllamaProvider::new(
            base_url,
            model,
            config.timeout,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: AiProvider, api_key: Option<&str>) -> AiConfig {
        AiConfig {
            provider,
            model: None,
            api_key: api_key.map(str::to_string),
            base_url: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("openai".parse::<AiProvider>().unwrap(), AiProvider::OpenAi);
        assert_eq!("Anthropic".parse::<AiProvider>().unwrap(), AiProvider::Anthropic);
        assert_eq!(" ollama ".parse::<AiProvider>().unwrap(), AiProvider::Ollama);
        assert!("gemini".parse::<AiProvider>().is_err());
    }

    #[test]
    fn test_provider_display_round_trips() {
        for provider in [AiProvider::OpenAi, AiProvider::Anthropic, AiProvider::Ollama] {
            assert_eq!(provider.to_string().parse::<AiProvider>().unwrap(), provider);
        }
    }

    #[test]
    fn test_effective_model_defaults_per_provider() {
        assert_eq!(config(AiProvider::OpenAi, None).effective_model(), "gpt-5");

        let mut custom = config(AiProvider::Anthropic, None);
        custom.model = Some("claude-opus-4-1".to_string());
        assert_eq!(custom.effective_model(), "claude-opus-4-1");
    }

    #[test]
    fn test_create_provider_requires_key() {
        let err = create_provider(&config(AiProvider::OpenAi, None)).err().unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_create_provider_ollama_needs_no_key() {
        let provider = create_provider(&config(AiProvider::Ollama, None)).unwrap();
        assert_eq!(provider.model_name(), "llama3.1");
    }
}
