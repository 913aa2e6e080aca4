use thiserror::Error;

/// Failures raised while building a provider request or reading its response.
///
/// These travel inside `anyhow::Error`; callers recover them with `downcast_ref`.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(
        "Error serializing parameters of tool call '{tool}': {source}. \
         Are the tool parameters fully typed?"
    )]
    ToolParamsSerialization {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid tool result for '{tool_call_id}': {reason}")]
    InvalidToolResult { tool_call_id: String, reason: String },

    #[error("System messages are not allowed for {model} models")]
    SystemPromptUnsupported { model: String },

    #[error("Image content is not PNG encoded")]
    ImageNotPng,

    #[error("System message at position {index} has no text")]
    EmptySystemPrompt { index: usize },

    #[error("Invalid value for call parameter '{name}': {value}")]
    InvalidParameter { name: String, value: String },

    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Streaming responses are not supported by the {0} provider")]
    StreamingUnsupported(String),

    #[error("Tool use in {0} responses is not supported")]
    ToolUseResponseUnsupported(String),
}
