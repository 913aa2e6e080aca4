use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

use super::message::ContentBlock;

/// A tool that can be used by a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// JSON schema of the parameters that the tool accepts
    pub parameters: Value,
}

impl Tool {
    /// Create a new tool with the given name, description and parameter schema
    pub fn new<N, D>(name: N, description: D, parameters: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Tool {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Create a tool whose parameter schema is derived from `P`
    pub fn from_schema<P, N, D>(name: N, description: D) -> Self
    where
        P: JsonSchema,
        N: Into<String>,
        D: Into<String>,
    {
        Self::new(name, description, schema_for!(P).to_value())
    }
}

/// Typed parameters of a tool call.
///
/// Any `Serialize` value qualifies. Serialization is deferred until the request is
/// built, so a value that cannot be represented as JSON fails that request.
pub trait ToolParams: Debug + Send + Sync {
    fn to_json(&self) -> serde_json::Result<Value>;
}

impl<T> ToolParams for T
where
    T: Serialize + Debug + Send + Sync,
{
    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// A request from the model to run a tool
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// The name of the tool to execute
    pub name: String,
    /// Identifier pairing this call with its result
    pub tool_call_id: String,
    /// The parameters for the execution
    pub params: Arc<dyn ToolParams>,
}

impl ToolCall {
    pub fn new<N, I, P>(name: N, tool_call_id: I, params: P) -> Self
    where
        N: Into<String>,
        I: Into<String>,
        P: ToolParams + 'static,
    {
        Self {
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            params: Arc::new(params),
        }
    }
}

impl PartialEq for ToolCall {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.tool_call_id == other.tool_call_id
            && self.params.to_json().ok() == other.params.to_json().ok()
    }
}

/// The output of a tool, sent back to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub result: Vec<ContentBlock>,
}

impl ToolResult {
    pub fn new<I: Into<String>>(tool_call_id: I, result: Vec<ContentBlock>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize, JsonSchema, Debug)]
    struct WeatherParams {
        /// The city and state, e.g. San Francisco, CA
        location: String,
    }

    #[test]
    fn test_tool_from_schema() {
        let tool = Tool::from_schema::<WeatherParams, _, _>("get_weather", "Gets the weather");
        assert_eq!(tool.name, "get_weather");
        assert_eq!(tool.parameters["type"], "object");
        assert_eq!(tool.parameters["properties"]["location"]["type"], "string");
        assert_eq!(tool.parameters["required"], json!(["location"]));
    }

    #[test]
    fn test_tool_call_params_to_json() {
        let call = ToolCall::new(
            "get_weather",
            "call_1",
            WeatherParams {
                location: "Paris".to_string(),
            },
        );
        assert_eq!(call.params.to_json().unwrap(), json!({"location": "Paris"}));
        assert_eq!(call, ToolCall::new("get_weather", "call_1", json!({"location": "Paris"})));
    }
}
