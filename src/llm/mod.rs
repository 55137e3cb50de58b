//! Model backend: wire types, the client trait, and the Anthropic HTTP client.

mod anthropic;
mod types;

use async_trait::async_trait;

pub use anthropic::AnthropicClient;
pub use types::{
    ContentBlock, Message, MessageContent, MessageRequest, MessageResponse, ModelReply, Role,
    StopReason, ToolCall, ToolChoice, ToolDefinition,
};

/// A model backend that answers one request with one complete response.
///
/// Implementations block the calling task until the whole response is
/// received; nothing is streamed. Transport, HTTP and decoding failures are
/// reported as errors and never retried by callers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_message(&self, request: &MessageRequest) -> anyhow::Result<MessageResponse>;
}
