use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::{Client as HttpClient, header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION}};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ChatClient;
use crate::cli::Args;
use crate::error::{ CompletionError, ConfigError };
use crate::llm::{ CompletionRequest, CompletionResponse };

pub struct GroqChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    max_retries: u32,
    retry_backoff: Duration,
}

#[derive(Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: Option<String>,
}

#[derive(Serialize)]
struct GroqRequest {
    messages: Vec<GroqMessage>,
    model: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
}

impl GroqChatClient {
    pub fn new(
        api_key: &str,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ConfigError::InvalidApiKey(e.to_string()))?
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            model,
            base_url,
            max_retries: 0,
            retry_backoff: Duration::ZERO,
        })
    }

    pub fn with_retries(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args.groq_api_key()?;
        let client = Self::new(
            &api_key,
            args.groq_model.clone(),
            args.groq_base_url.clone(),
            args.completion_timeout(),
        )?;
        Ok(client.with_retries(
            args.completion_max_retries,
            Duration::from_millis(args.completion_retry_backoff_ms),
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, request: &CompletionRequest) -> GroqRequest {
        GroqRequest {
            messages: vec![
                GroqMessage {
                    role: "system".to_string(),
                    content: Some(request.system.clone()),
                },
                GroqMessage {
                    role: "user".to_string(),
                    content: Some(request.user.clone()),
                },
            ],
            model: self.model.clone(),
            temperature: request.temperature,
        }
    }

    async fn send_once(&self, body: &GroqRequest) -> Result<CompletionResponse, CompletionError> {
        let resp = self.http.post(self.endpoint())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status { status, body: text });
        }
        parse_response(&text)
    }
}

/// Pulls the first choice's content out of a chat completions body.
fn parse_response(body: &str) -> Result<CompletionResponse, CompletionError> {
    let parsed: GroqResponse = serde_json::from_str(body)?;
    let choice = parsed.choices
        .into_iter()
        .next()
        .ok_or(CompletionError::NoChoices)?;
    let content = choice.message.content.ok_or(CompletionError::NoContent)?;
    Ok(CompletionResponse { response: content })
}

#[async_trait]
impl ChatClient for GroqChatClient {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, CompletionError> {
        let body = self.build_request(request);
        let mut attempt = 0;
        loop {
            match self.send_once(&body).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.retry_backoff.saturating_mul(attempt);
                    warn!("Groq attempt {} failed ({}), retrying in {:?}", attempt, e, delay);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    debug!("Groq request failed after {} attempt(s)", attempt + 1);
                    return Err(e);
                }
            }
        }
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
