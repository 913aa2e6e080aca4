use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::models::message::Message;
use crate::models::tool::Tool;

/// Caller supplied parameters for a single model call
pub type CallParams = Map<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub usage: Usage,
}

/// The request actually sent to the model runtime
#[derive(Debug, Clone, PartialEq)]
pub struct ConverseRequest {
    pub model_id: String,
    pub body: Value,
}

impl ConverseRequest {
    pub fn system(&self) -> &[Value] {
        self.body["system"].as_array().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn messages(&self) -> &[Value] {
        self.body["messages"].as_array().map(Vec::as_slice).unwrap_or_default()
    }
}

/// Everything the response parser needs from one call
#[derive(Debug, Clone)]
pub struct ApiCallResult {
    pub response: Value,
    pub actual_streaming: bool,
    /// Completion count the caller asked for
    pub actual_n: u32,
    pub final_call_params: ConverseRequest,
}

/// Handle to a model runtime endpoint
#[async_trait]
pub trait ConverseClient: Send + Sync {
    async fn converse(&self, request: &ConverseRequest) -> Result<Value>;
}

pub type SharedClient = Arc<dyn ConverseClient>;

/// Base trait for model providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name the provider is registered under
    fn name(&self) -> &'static str;

    /// Whether the provider can deliver streamed responses end to end
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Build the provider request and issue exactly one call through `client`
    async fn call_model(
        &self,
        client: &dyn ConverseClient,
        model: &str,
        messages: &[Message],
        api_params: &CallParams,
        tools: &[Tool],
    ) -> Result<ApiCallResult>;

    /// Convert a raw call result into canonical messages plus usage
    fn process_response(
        &self,
        call_result: &ApiCallResult,
        invocation_origin: &str,
    ) -> Result<(Vec<Message>, ResponseMetadata)>;

    async fn complete(
        &self,
        client: &dyn ConverseClient,
        model: &str,
        messages: &[Message],
        api_params: &CallParams,
        tools: &[Tool],
        invocation_origin: &str,
    ) -> Result<(Vec<Message>, ResponseMetadata)> {
        let call_result = self
            .call_model(client, model, messages, api_params, tools)
            .await?;
        self.process_response(&call_result, invocation_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_usage_serialization() -> Result<()> {
        let usage = Usage::new(10, 20, 30);
        let json_value = serde_json::to_value(ResponseMetadata { usage })?;

        assert_eq!(
            json_value,
            json!({"usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}})
        );
        Ok(())
    }

    #[test]
    fn test_converse_request_accessors() {
        let request = ConverseRequest {
            model_id: "m".to_string(),
            body: json!({"messages": [{"role": "user", "content": []}], "system": []}),
        };
        assert_eq!(request.messages().len(), 1);
        assert!(request.system().is_empty());

        let empty = ConverseRequest {
            model_id: "m".to_string(),
            body: json!({}),
        };
        assert!(empty.messages().is_empty());
    }
}
