// OpenRouter-compatible chat completions client
//
// Works against any endpoint speaking the OpenAI chat format. No retry: a
// failed call is reported once and the orchestrator decides what happens next.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::types::{ChatMessage, ChatRequest, ChatResponse, InferenceError};
use super::InferenceClient;
use crate::config::Config;

#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    url: String,
    temperature: f32,
    system_prompt: String,
    app_url: String,
    app_title: String,
}

impl OpenRouterClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: config.chat_completions_url(),
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
            app_url: config.app_url.clone(),
            app_title: config.app_title.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn to_request(&self, model: &str, prompt: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(prompt),
            ],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl InferenceClient for OpenRouterClient {
    async fn infer(
        &self,
        credential: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, InferenceError> {
        let request = self.to_request(model, prompt);

        tracing::debug!(model, url = %self.url, prompt_bytes = prompt.len(), "Sending inference request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(credential)
            .header("content-type", "application/json")
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_title)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Protocol {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let content = match serde_json::from_str::<ChatResponse>(&body) {
            Ok(parsed) => parsed.first_content().to_string(),
            Err(e) => {
                // Valid JSON in an unexpected shape still counts as "no content"
                if serde_json::from_str::<serde_json::Value>(&body).is_ok() {
                    tracing::warn!(model, "Unexpected inference response shape: {}", e);
                    String::new()
                } else {
                    return Err(InferenceError::Decode(e.to_string()));
                }
            }
        };

        tracing::debug!(model, content_bytes = content.len(), "Received inference response");

        Ok(content)
    }
}
