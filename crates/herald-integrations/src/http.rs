//! HTTP plumbing shared by tracker clients.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Build a client with the run-wide request timeout applied
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("herald/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

#[derive(Debug, Deserialize)]
struct GraphQlEnvelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

/// Extension trait for `reqwest::Response` covering the error shapes we see.
#[async_trait::async_trait]
pub(crate) trait ResponseExt {
    /// Fail with status and body unless the response is 2xx.
    async fn ensure_success(self, api_name: &str) -> Result<Self>
    where
        Self: Sized;

    /// Decode a GraphQL response, turning a non-empty `errors` array into an error.
    async fn graphql_data<T: DeserializeOwned + Send>(self, api_name: &str) -> Result<T>
    where
        Self: Sized;
}

#[async_trait::async_trait]
impl ResponseExt for reqwest::Response {
    async fn ensure_success(self, api_name: &str) -> Result<Self> {
        if !self.status().is_success() {
            let status = self.status();
            let error_text = self.text().await.unwrap_or_default();
            anyhow::bail!("{api_name} API error ({status}): {error_text}");
        }
        Ok(self)
    }

    async fn graphql_data<T: DeserializeOwned + Send>(self, api_name: &str) -> Result<T> {
        let envelope: GraphQlEnvelope<T> = self
            .ensure_success(api_name)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse {api_name} API response"))?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
            anyhow::bail!("{api_name} GraphQL errors: {}", messages.join("; "));
        }

        envelope
            .data
            .with_context(|| format!("Missing 'data' in {api_name} API response"))
    }
}
