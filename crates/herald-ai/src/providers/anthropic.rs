use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::ai_provider::TextGenerator;

/// Anthropic Claude API Provider
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url
                .unwrap_or("https://api.anthropic.com/v1")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/messages", self.base_url);

        let body = json!({
            "model": self.model,
            "max_tokens": 4096,
            "system": system,
            "messages": [{
                "role": "user",
                "content": prompt
            }]
        });

        log::debug!("POST {url} (model {})", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Anthropic")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({status}): {error_text}");
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Anthropic response")?;

        // content[0].text
        json["content"][0]["text"]
            .as_str()
            .map(ToString::to_string)
            .context("Failed to extract text from Anthropic response")
    }
}
