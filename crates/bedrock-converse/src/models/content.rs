/// Leading bytes of every PNG stream
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    pub text: String,
    /// Invocation that produced this text, when it came back from a model call
    pub origin_trace: Option<String>,
}

impl TextContent {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            origin_trace: None,
        }
    }

    pub fn with_origin<S: Into<String>, O: Into<String>>(text: S, origin: O) -> Self {
        Self {
            text: text.into(),
            origin_trace: Some(origin.into()),
        }
    }
}

/// A PNG encoded image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageContent {
    pub data: Vec<u8>,
}

impl ImageContent {
    pub fn png(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Whether the bytes start with the PNG signature
    pub fn is_png(&self) -> bool {
        self.data.starts_with(&PNG_SIGNATURE)
    }
}
