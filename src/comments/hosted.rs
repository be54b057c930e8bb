//! Hosted chat-completion backend.
//!
//! POST {base_url}/chat/completions with bearer auth.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::strategy::{settle, CommentStrategy, StrategyError, TransportHandle};
use crate::language::SourceLanguage;
use crate::settings::HostedSettings;

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct HostedStrategy {
    api_key: String,
    endpoint: String,
    model: String,
    timeout: Duration,
    transport: TransportHandle,
}

impl HostedStrategy {
    /// Returns `None` when no API key is configured.
    pub fn from_settings(settings: &HostedSettings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;
        Some(Self {
            api_key,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model.clone(),
            timeout: Duration::from_millis(settings.timeout_ms),
            transport: TransportHandle::default(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(
        &self,
        http: &reqwest::Client,
        source: &str,
        language: SourceLanguage,
    ) -> Result<String, StrategyError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt(source, language),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(StrategyError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status.as_u16()));
        }

        let parsed: ChatResponse = response.json().await.map_err(StrategyError::from_request)?;
        extract_content(parsed)
    }
}

fn prompt(source: &str, language: SourceLanguage) -> String {
    format!(
        "Add meaningful comments to this {} code. Make the comments helpful and explain what \
         each section does. Preserve the original code structure and indentation.\n\nCode:\n{}",
        language.as_str(),
        source
    )
}

fn extract_content(response: ChatResponse) -> Result<String, StrategyError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(StrategyError::EmptyResponse)
}

impl CommentStrategy for HostedStrategy {
    fn name(&self) -> &'static str {
        "hosted"
    }

    fn try_generate(&self, source: &str, language: SourceLanguage) -> Option<String> {
        let transport = self.transport.get(self.name())?;
        let result = transport.run(self.request(&transport.http, source, language));
        settle(self.name(), result)
    }
}
