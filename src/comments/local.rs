//! Local text-generation endpoint backend.
//!
//! Speaks the common `{model, inputs, parameters}` generation request and
//! expects an array of `{generated_text}` objects back.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::strategy::{settle, CommentStrategy, StrategyError, TransportHandle};
use crate::language::SourceLanguage;
use crate::settings::LocalModelSettings;

const MAX_LENGTH: u32 = 512;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    inputs: String,
    parameters: GenerateParameters,
}

#[derive(Debug, Serialize)]
struct GenerateParameters {
    max_length: u32,
    num_return_sequences: u32,
}

#[derive(Debug, Deserialize)]
struct Generated {
    #[serde(default)]
    generated_text: String,
}

pub struct LocalModelStrategy {
    endpoint: String,
    model: String,
    timeout: Duration,
    transport: TransportHandle,
}

impl LocalModelStrategy {
    /// Returns `None` when no endpoint is configured.
    pub fn from_settings(settings: &LocalModelSettings) -> Option<Self> {
        let endpoint = settings.endpoint.clone()?;
        Some(Self {
            endpoint,
            model: settings.model.clone(),
            timeout: Duration::from_millis(settings.timeout_ms),
            transport: TransportHandle::default(),
        })
    }

    async fn request(
        &self,
        http: &reqwest::Client,
        source: &str,
        language: SourceLanguage,
    ) -> Result<String, StrategyError> {
        let body = GenerateRequest {
            model: &self.model,
            inputs: format!("Add comments to this {} code:\n{}", language.as_str(), source),
            parameters: GenerateParameters {
                max_length: MAX_LENGTH,
                num_return_sequences: 1,
            },
        };

        let response = http
            .post(&self.endpoint)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(StrategyError::from_request)?;

        if !response.status().is_success() {
            return Err(StrategyError::Status(response.status().as_u16()));
        }

        let generated: Vec<Generated> =
            response.json().await.map_err(StrategyError::from_request)?;
        first_text(generated)
    }
}

fn first_text(generated: Vec<Generated>) -> Result<String, StrategyError> {
    generated
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(StrategyError::EmptyResponse)
}

impl CommentStrategy for LocalModelStrategy {
    fn name(&self) -> &'static str {
        "local-model"
    }

    fn try_generate(&self, source: &str, language: SourceLanguage) -> Option<String> {
        let transport = self.transport.get(self.name())?;
        let result = transport.run(self.request(&transport.http, source, language));
        settle(self.name(), result)
    }
}
