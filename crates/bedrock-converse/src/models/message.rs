use serde::Serialize;
use serde_json::Value;

use super::content::{ImageContent, TextContent};
use super::role::Role;
use super::tool::{ToolCall, ToolParams, ToolResult};

#[derive(Debug, Clone, PartialEq)]
/// A single block of message content, exactly one kind at a time
pub enum ContentBlock {
    Text(TextContent),
    Image(ImageContent),
    /// A structured value produced by a structured-output call
    Parsed(Value),
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

impl ContentBlock {
    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text(TextContent::new(text))
    }

    pub fn image(image: ImageContent) -> Self {
        ContentBlock::Image(image)
    }

    /// Capture a structured value; fails if it cannot be represented as JSON
    pub fn parsed<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        Ok(ContentBlock::Parsed(serde_json::to_value(value)?))
    }

    /// Short name of the populated variant
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text(_) => "text",
            ContentBlock::Image(_) => "image",
            ContentBlock::Parsed(_) => "parsed",
            ContentBlock::ToolCall(_) => "tool_call",
            ContentBlock::ToolResult(_) => "tool_result",
        }
    }

    /// Get the text content if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        if let ContentBlock::ToolCall(ref tool_call) = self {
            Some(tool_call)
        } else {
            None
        }
    }

    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        if let ContentBlock::ToolResult(ref tool_result) = self {
            Some(tool_result)
        } else {
            None
        }
    }
}

impl From<TextContent> for ContentBlock {
    fn from(text: TextContent) -> Self {
        ContentBlock::Text(text)
    }
}

impl From<ImageContent> for ContentBlock {
    fn from(image: ImageContent) -> Self {
        ContentBlock::Image(image)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn new(role: Role) -> Self {
        Message {
            role,
            content: Vec::new(),
        }
    }

    pub fn system() -> Self {
        Self::new(Role::System)
    }

    pub fn user() -> Self {
        Self::new(Role::User)
    }

    pub fn assistant() -> Self {
        Self::new(Role::Assistant)
    }

    pub fn tool() -> Self {
        Self::new(Role::Tool)
    }

    /// Add any ContentBlock to the message
    pub fn with_content(mut self, content: ContentBlock) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(ContentBlock::text(text))
    }

    /// Add PNG encoded image content to the message
    pub fn with_png(self, data: Vec<u8>) -> Self {
        self.with_content(ContentBlock::image(ImageContent::png(data)))
    }

    /// Add an already converted structured value to the message
    pub fn with_parsed(self, value: Value) -> Self {
        self.with_content(ContentBlock::Parsed(value))
    }

    /// Add a tool call to the message
    pub fn with_tool_call<N, I, P>(self, name: N, tool_call_id: I, params: P) -> Self
    where
        N: Into<String>,
        I: Into<String>,
        P: ToolParams + 'static,
    {
        self.with_content(ContentBlock::ToolCall(ToolCall::new(
            name,
            tool_call_id,
            params,
        )))
    }

    /// Add a tool result to the message
    pub fn with_tool_result<I: Into<String>>(
        self,
        tool_call_id: I,
        result: Vec<ContentBlock>,
    ) -> Self {
        self.with_content(ContentBlock::ToolResult(ToolResult::new(
            tool_call_id,
            result,
        )))
    }

    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_call)
            .collect()
    }

    pub fn tool_results(&self) -> Vec<&ToolResult> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_result)
            .collect()
    }

    /// All text blocks of the message, joined by newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
