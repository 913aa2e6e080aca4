use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::base::{
    ApiCallResult, CallParams, ConverseClient, ConverseRequest, Provider, ResponseMetadata,
};
use super::configs::{BedrockProviderConfig, ProviderConfig};
use super::utils::{
    build_converse_request, check_bedrock_context_length_error, converse_response_to_message,
    get_usage,
};
use crate::errors::ProviderError;
use crate::models::message::Message;
use crate::models::tool::Tool;

pub const BEDROCK_PROVIDER_NAME: &str = "bedrock";

/// HTTP client for the bedrock runtime converse endpoint
pub struct BedrockClient {
    client: Client,
    config: BedrockProviderConfig,
}

impl BedrockClient {
    pub fn new(config: BedrockProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(BedrockProviderConfig::from_env()?)
    }

    pub fn config(&self) -> &BedrockProviderConfig {
        &self.config
    }

    fn converse_url(&self, model_id: &str) -> String {
        format!(
            "{}/model/{}/converse",
            self.config.host.trim_end_matches('/'),
            urlencoding::encode(model_id)
        )
    }
}

#[async_trait]
impl ConverseClient for BedrockClient {
    async fn converse(&self, request: &ConverseRequest) -> Result<Value> {
        let url = self.converse_url(&request.model_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request.body)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
                Err(anyhow!("Server error: {}", status))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                // Raise specific error if context length is exceeded
                if let Ok(error) = serde_json::from_str::<Value>(&error_text) {
                    if let Some(err) = check_bedrock_context_length_error(&error) {
                        return Err(err.into());
                    }
                }
                Err(anyhow!("Request failed: {}: {}", status, error_text))
            }
        }
    }
}

/// Adapts canonical messages to the bedrock converse API
#[derive(Debug, Default, Clone, Copy)]
pub struct BedrockProvider;

#[async_trait]
impl Provider for BedrockProvider {
    fn name(&self) -> &'static str {
        BEDROCK_PROVIDER_NAME
    }

    async fn call_model(
        &self,
        client: &dyn ConverseClient,
        model: &str,
        messages: &[Message],
        api_params: &CallParams,
        tools: &[Tool],
    ) -> Result<ApiCallResult> {
        let (request, actual_n) = build_converse_request(model, messages, api_params, tools)?;
        tracing::debug!(
            model,
            messages = request.messages().len(),
            system = request.system().len(),
            "Sending converse request"
        );

        let response = client.converse(&request).await?;

        Ok(ApiCallResult {
            response,
            actual_streaming: false,
            actual_n,
            final_call_params: request,
        })
    }

    fn process_response(
        &self,
        call_result: &ApiCallResult,
        invocation_origin: &str,
    ) -> Result<(Vec<Message>, ResponseMetadata)> {
        if call_result.actual_streaming {
            let provider = BEDROCK_PROVIDER_NAME.to_string();
            return Err(ProviderError::StreamingUnsupported(provider).into());
        }

        // A non-streamed response is a single chunk, so it yields a single message
        let message = converse_response_to_message(&call_result.response, invocation_origin)?;
        let metadata = ResponseMetadata {
            usage: get_usage(&call_result.response),
        };
        tracing::debug!(usage = ?metadata.usage, "Received converse response");

        Ok((vec![message], metadata))
    }
}
