use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::str::FromStr;

use super::base::{CallParams, ConverseRequest, Usage};
use crate::errors::ProviderError;
use crate::models::content::{ImageContent, TextContent};
use crate::models::message::{ContentBlock, Message};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall, ToolResult};

/// Models that refuse a system prompt
pub const SYSTEM_PROMPT_INCOMPATIBLE_MODELS: [&str; 2] = ["o1-preview", "o1-mini"];

/// Call parameters lifted into `inferenceConfig`, with their wire names
const INFERENCE_PARAMS: [(&str, &str); 4] = [
    ("max_tokens", "maxTokens"),
    ("temperature", "temperature"),
    ("top_p", "topP"),
    ("stop", "stopSequences"),
];

/// Images are always sent as PNG; anything else is rejected
pub fn image_to_converse(image: &ImageContent) -> Result<Value> {
    if !image.is_png() {
        return Err(ProviderError::ImageNotPng.into());
    }

    Ok(json!({
        "image": {
            "format": "png",
            "source": { "bytes": STANDARD.encode(&image.data) }
        }
    }))
}

/// Convert a single content block; tool blocks and empty text contribute nothing
pub fn content_block_to_converse(block: &ContentBlock) -> Result<Option<Value>> {
    match block {
        ContentBlock::Image(image) => image_to_converse(image).map(Some),
        ContentBlock::Text(text) if !text.text.is_empty() => {
            Ok(Some(json!({ "text": text.text })))
        }
        ContentBlock::Parsed(value) => Ok(Some(json!({ "text": value.to_string() }))),
        _ => Ok(None),
    }
}

pub fn tool_call_to_converse(tool_call: &ToolCall) -> Result<Value> {
    let input = tool_call.params.to_json().map_err(|source| {
        tracing::error!(
            tool = %tool_call.name,
            error = %source,
            "Error serializing tool call parameters"
        );
        ProviderError::ToolParamsSerialization {
            tool: tool_call.name.clone(),
            source,
        }
    })?;

    Ok(json!({
        "toolUse": {
            "toolUseId": tool_call.tool_call_id,
            "name": tool_call.name,
            "input": input,
        }
    }))
}

/// A tool result must hold exactly one text block
pub fn tool_result_to_converse(tool_result: &ToolResult) -> Result<Value> {
    let invalid = |reason: String| ProviderError::InvalidToolResult {
        tool_call_id: tool_result.tool_call_id.clone(),
        reason,
    };

    let text = match tool_result.result.as_slice() {
        [ContentBlock::Text(text)] => &text.text,
        [other] => {
            return Err(invalid(format!(
                "expected a text content block, got {}",
                other.kind()
            ))
            .into())
        }
        blocks => {
            return Err(invalid(format!(
                "expected exactly one content block, got {}",
                blocks.len()
            ))
            .into())
        }
    };

    Ok(json!({
        "toolResult": {
            "toolUseId": tool_result.tool_call_id,
            "content": [{ "text": text }],
        }
    }))
}

/// Convert one non-system message to a converse message
pub fn message_to_converse_spec(message: &Message) -> Result<Value> {
    let mut content = Vec::new();
    for block in &message.content {
        if let Some(converted) = content_block_to_converse(block)? {
            content.push(converted);
        }
    }

    let tool_calls = message.tool_calls();
    if !tool_calls.is_empty() {
        content = tool_calls
            .into_iter()
            .map(tool_call_to_converse)
            .collect::<Result<_>>()?;
    }

    for tool_result in message.tool_results() {
        content.push(tool_result_to_converse(tool_result)?);
    }

    Ok(json!({
        "role": message.role,
        "content": content,
    }))
}

/// Split messages into the system prompt list and the converse message list
pub fn messages_to_converse_spec(messages: &[Message]) -> Result<(Vec<Value>, Vec<Value>)> {
    let mut system = Vec::new();
    let mut converse_messages = Vec::new();

    for (index, message) in messages.iter().enumerate() {
        if message.role == Role::System {
            let text = message.text();
            if text.is_empty() {
                return Err(ProviderError::EmptySystemPrompt { index }.into());
            }
            system.push(json!({ "text": text }));
        } else {
            converse_messages.push(message_to_converse_spec(message)?);
        }
    }

    Ok((system, converse_messages))
}

/// Convert internal Tool format to bedrock's toolConfig
pub fn tools_to_converse_spec(tools: &[Tool]) -> Result<Value> {
    let mut tool_names = HashSet::new();
    let mut specs = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(ProviderError::DuplicateTool(tool.name.clone()).into());
        }

        specs.push(json!({
            "toolSpec": {
                "name": tool.name,
                "description": tool.description,
                "inputSchema": { "json": tool.parameters },
            }
        }));
    }

    Ok(json!({
        "tools": specs,
        "toolChoice": { "auto": {} },
    }))
}

/// Move sampling parameters out of `params` into an inferenceConfig object
fn take_inference_config(params: &mut CallParams) -> Map<String, Value> {
    let mut config = Map::new();
    for (key, wire_name) in INFERENCE_PARAMS {
        match params.remove(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(stop)) if key == "stop" => {
                config.insert(wire_name.to_string(), json!([stop]));
            }
            Some(value) => {
                config.insert(wire_name.to_string(), value);
            }
        }
    }
    config
}

/// Build the converse request for `model`, returning it with the requested completion count
pub fn build_converse_request(
    model: &str,
    messages: &[Message],
    api_params: &CallParams,
    tools: &[Tool],
) -> Result<(ConverseRequest, u32)> {
    if SYSTEM_PROMPT_INCOMPATIBLE_MODELS.contains(&model)
        && messages.iter().any(|message| message.role == Role::System)
    {
        return Err(ProviderError::SystemPromptUnsupported {
            model: model.to_string(),
        }
        .into());
    }

    let mut params = api_params.clone();
    let actual_n = match params.remove("n") {
        None | Some(Value::Null) => 1,
        Some(n) => n
            .as_u64()
            .and_then(|count| u32::try_from(count).ok())
            .filter(|count| *count > 0)
            .ok_or_else(|| ProviderError::InvalidParameter {
                name: "n".to_string(),
                value: n.to_string(),
            })?,
    };
    // Streaming is never requested from this provider
    params.remove("stream");
    params.remove("stream_options");

    let (system, converse_messages) = messages_to_converse_spec(messages)?;
    let structured = params.contains_key("response_format");
    let inference_config = take_inference_config(&mut params);

    let mut body = json!({
        "messages": converse_messages,
        "system": system,
    });
    if !inference_config.is_empty() {
        body["inferenceConfig"] = Value::Object(inference_config);
    }
    // Tools are not sent on the structured response path
    if !tools.is_empty() && !structured {
        body["toolConfig"] = tools_to_converse_spec(tools)?;
    }
    if !params.is_empty() {
        body["additionalModelRequestFields"] = Value::Object(params);
    }

    Ok((
        ConverseRequest {
            model_id: model.to_string(),
            body,
        },
        actual_n,
    ))
}

/// Read usage counts from a converse response, treating missing fields as zero
pub fn get_usage(response: &Value) -> Usage {
    let usage = &response["usage"];
    let count = |key: &str| usage.get(key).and_then(Value::as_u64).unwrap_or(0);

    Usage::new(
        count("inputTokens"),
        count("outputTokens"),
        count("totalTokens"),
    )
}

/// Convert bedrock's converse response to internal Message format
pub fn converse_response_to_message(response: &Value, invocation_origin: &str) -> Result<Message> {
    let message = response
        .get("output")
        .and_then(|output| output.get("message"))
        .ok_or_else(|| anyhow!("Invalid response format from Bedrock: missing output.message"))?;

    let role = message
        .get("role")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Invalid response format from Bedrock: missing role"))?;
    let role =
        Role::from_str(role).map_err(|_| anyhow!("Unknown role in Bedrock response: {}", role))?;

    let content = message
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Invalid response format from Bedrock: missing content"))?;

    if content.iter().any(|block| block.get("toolUse").is_some()) {
        return Err(ProviderError::ToolUseResponseUnsupported("bedrock".to_string()).into());
    }

    let text = content
        .first()
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Invalid response format from Bedrock: no text content"))?;

    Ok(Message::new(role).with_content(ContentBlock::Text(TextContent::with_origin(
        text,
        invocation_origin,
    ))))
}

#[derive(Debug, thiserror::Error)]
#[error("Context length exceeded. Message: {0}")]
pub struct ContextLengthExceededError(String);

pub fn check_bedrock_context_length_error(error: &Value) -> Option<ContextLengthExceededError> {
    let message = error
        .get("message")
        .or_else(|| error.get("Message"))?
        .as_str()?;
    if message.to_lowercase().contains("too long") {
        Some(ContextLengthExceededError(message.to_string()))
    } else {
        None
    }
}
