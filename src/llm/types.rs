//! Wire types for the Messages API.
//!
//! Requests and responses follow the Anthropic Messages shape: a list of
//! role-tagged messages whose content is either plain text or a list of typed
//! content blocks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// A user message holding plain text.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// A user message holding content blocks (tool results).
    pub fn user_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// An assistant message holding content blocks (tool invocations).
    pub fn assistant_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// The content blocks of this message, empty for plain text.
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }
}

/// Message content: either a bare string or structured blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult { tool_use_id: String, content: String },
}

/// A tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// How the model may pick tools. Only `auto` is ever sent: the model decides
/// per call whether to use a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolChoice {
    Auto,
}

/// Outbound request to the model backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
}

impl MessageRequest {
    /// Whether this request offers any tools to the model.
    pub fn offers_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|tools| !tools.is_empty())
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndTurn => write!(f, "end_turn"),
            Self::ToolUse => write!(f, "tool_use"),
            Self::MaxTokens => write!(f, "max_tokens"),
            Self::StopSequence => write!(f, "stop_sequence"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A complete (non-streamed) response from the model backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageResponse {
    /// Missing stop reasons are treated as a natural end of turn.
    #[serde(default = "default_stop_reason")]
    pub stop_reason: StopReason,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

fn default_stop_reason() -> StopReason {
    StopReason::EndTurn
}

/// One tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// A response discriminated by what the model wants next.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// The model finished without asking for tools.
    Text(String),
    /// The model asked for tools. `content` is the raw block list to echo back
    /// as the assistant message; `calls` holds the tool-use blocks in order.
    ToolRequest {
        content: Vec<ContentBlock>,
        calls: Vec<ToolCall>,
    },
    /// The model finished but produced no text block.
    Empty,
}

impl MessageResponse {
    /// Build a plain-text response (mostly useful for tests and fakes).
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            stop_reason: StopReason::EndTurn,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Build a tool-use response from `(id, name, input)` triples.
    pub fn tool_use<I, S>(calls: I) -> Self
    where
        I: IntoIterator<Item = (S, S, Value)>,
        S: Into<String>,
    {
        Self {
            stop_reason: StopReason::ToolUse,
            content: calls
                .into_iter()
                .map(|(id, name, input)| ContentBlock::ToolUse {
                    id: id.into(),
                    name: name.into(),
                    input,
                })
                .collect(),
        }
    }

    /// Concatenated text of all text blocks, `None` if there are none.
    pub fn text_content(&self) -> Option<String> {
        let parts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.concat())
        }
    }

    /// Tool-use blocks in the order the model returned them.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Classify the response.
    ///
    /// Anything other than `tool_use` counts as a finished answer. A
    /// `tool_use` response keeps its raw content even when it holds no
    /// tool-use blocks, so the caller can detect that inconsistency.
    pub fn into_reply(self) -> ModelReply {
        if self.stop_reason == StopReason::ToolUse {
            let calls = self.tool_calls();
            ModelReply::ToolRequest {
                content: self.content,
                calls,
            }
        } else {
            match self.text_content() {
                Some(text) => ModelReply::Text(text),
                None => ModelReply::Empty,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_without_tools_omits_tool_fields() {
        let request = MessageRequest {
            model: "m".to_string(),
            max_tokens: 800,
            temperature: 0.0,
            system: "sys".to_string(),
            messages: vec![Message::user_text("hi")],
            tools: None,
            tool_choice: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
        assert_eq!(body["messages"][0], json!({"role": "user", "content": "hi"}));
        assert!(!request.offers_tools());
    }

    #[test]
    fn request_with_tools_serializes_auto_choice() {
        let request = MessageRequest {
            model: "m".to_string(),
            max_tokens: 800,
            temperature: 0.0,
            system: "sys".to_string(),
            messages: vec![Message::user_text("hi")],
            tools: Some(vec![ToolDefinition {
                name: "search".to_string(),
                description: "Search".to_string(),
                input_schema: json!({"type": "object"}),
            }]),
            tool_choice: Some(ToolChoice::Auto),
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["tool_choice"], json!({"type": "auto"}));
        assert_eq!(body["tools"][0]["input_schema"], json!({"type": "object"}));
        assert!(request.offers_tools());
    }

    #[test]
    fn tool_result_message_serializes_blocks() {
        let message = Message::user_blocks(vec![ContentBlock::ToolResult {
            tool_use_id: "toolu_1".to_string(),
            content: "found it".to_string(),
        }]);

        let body = serde_json::to_value(&message).unwrap();
        assert_eq!(
            body,
            json!({
                "role": "user",
                "content": [{"type": "tool_result", "tool_use_id": "toolu_1", "content": "found it"}]
            })
        );
    }

    #[test]
    fn response_deserializes_tool_use() {
        let response: MessageResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "stop_reason": "tool_use",
            "content": [
                {"type": "text", "text": "Let me look that up."},
                {"type": "tool_use", "id": "toolu_1", "name": "search", "input": {"query": "rust"}}
            ]
        }))
        .unwrap();

        match response.into_reply() {
            ModelReply::ToolRequest { content, calls } => {
                assert_eq!(content.len(), 2);
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "search");
                assert_eq!(calls[0].input, json!({"query": "rust"}));
            }
            other => panic!("expected tool request, got {other:?}"),
        }
    }

    #[test]
    fn unknown_stop_reason_is_a_text_answer() {
        let response: MessageResponse = serde_json::from_value(json!({
            "stop_reason": "refusal",
            "content": [{"type": "text", "text": "no"}]
        }))
        .unwrap();

        assert_eq!(response.stop_reason, StopReason::Other);
        assert_eq!(response.into_reply(), ModelReply::Text("no".to_string()));
    }

    #[test]
    fn finished_response_without_text_is_empty() {
        let response = MessageResponse {
            stop_reason: StopReason::EndTurn,
            content: vec![],
        };
        assert_eq!(response.into_reply(), ModelReply::Empty);
    }

    #[test]
    fn text_content_joins_text_blocks() {
        let response = MessageResponse {
            stop_reason: StopReason::MaxTokens,
            content: vec![
                ContentBlock::Text { text: "part one, ".to_string() },
                ContentBlock::Text { text: "part two".to_string() },
            ],
        };
        assert_eq!(response.text_content().as_deref(), Some("part one, part two"));
    }
}
