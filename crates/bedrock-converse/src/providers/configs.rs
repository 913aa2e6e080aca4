pub mod base;
pub mod bedrock;

pub use base::ProviderConfig;
pub use bedrock::BedrockProviderConfig;
