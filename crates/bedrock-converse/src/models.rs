//! These models represent the canonical objects the orchestration layer passes around
//!
//! There are two formats we need to interact with:
//! - canonical messages/tools, produced and consumed by the surrounding framework
//! - bedrock converse messages/tools, sent to and received from the model runtime
//!
//! We always immediately convert the provider format into these internal structs using
//! the helpers in `providers::utils`. The internal models do not match the wire format.
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
