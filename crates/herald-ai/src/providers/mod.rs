pub mod anthropic;
pub mod ollama;
pub mod openai;

use std::time::Duration;

use anyhow::{Context, Result};

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}
