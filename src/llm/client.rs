//! HTTP client for the Ollama API.
//!
//! Only two endpoints are used:
//! - `GET /api/tags` as a liveness probe
//! - `POST /api/generate` for non-streaming completions

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{GenerationError, Generator};
use crate::config::OllamaSettings;

/// Ollama client.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    model: String,
    probe_timeout: Duration,
    generate_timeout: Duration,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(settings: &OllamaSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            probe_timeout: Duration::from_secs(settings.probe_timeout_secs),
            generate_timeout: Duration::from_secs(settings.generate_timeout_secs),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether the server answers the tag listing with a success status.
    /// Never fails; any error means "not available".
    pub async fn check_availability(&self) -> bool {
        let result = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(self.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Ollama probe failed: {}", e);
                false
            }
        }
    }
}

impl Generator for OllamaClient {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        temperature: f32,
    ) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: format!("System: {}\n\nUser: {}", system, prompt),
            stream: false,
            options: GenerateOptions { temperature },
        };

        tracing::debug!(
            "Generating with {} (temperature {}, {} prompt chars)",
            self.model,
            temperature,
            body.prompt.len()
        );

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.generate_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!("Ollama returned {}", status);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        Ok(parsed.response)
    }
}
