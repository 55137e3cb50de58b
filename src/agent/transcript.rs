//! Append-only conversation transcript for a single run.

use crate::llm::{ContentBlock, Message};

/// Ordered messages exchanged during one run.
///
/// Messages are only ever pushed. Requests receive a [`snapshot`] so earlier
/// request payloads never change after they were sent.
///
/// [`snapshot`]: Transcript::snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with the user's query.
    pub fn new(query: &str) -> Self {
        Self {
            messages: vec![Message::user_text(query)],
        }
    }

    /// Append one tool round: the assistant's blocks followed by the results.
    pub fn push_tool_round(&mut self, assistant: Vec<ContentBlock>, results: Vec<ContentBlock>) {
        self.messages.push(Message::assistant_blocks(assistant));
        self.messages.push(Message::user_blocks(results));
    }

    /// Copy of the messages for an outbound request.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageContent, Role};
    use serde_json::json;

    #[test]
    fn tool_round_adds_assistant_then_user() {
        let mut transcript = Transcript::new("What is in lesson 4?");
        let before = transcript.snapshot();

        transcript.push_tool_round(
            vec![ContentBlock::ToolUse {
                id: "tool_1".to_string(),
                name: "get_course_outline".to_string(),
                input: json!({"course_title": "Python"}),
            }],
            vec![ContentBlock::ToolResult {
                tool_use_id: "tool_1".to_string(),
                content: "Lesson 4: OOP".to_string(),
            }],
        );

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.messages()[0].content, MessageContent::Text("What is in lesson 4?".to_string()));
        assert_eq!(transcript.messages()[1].role, Role::Assistant);
        assert_eq!(transcript.messages()[2].role, Role::User);
        // Earlier snapshots are unaffected.
        assert_eq!(before.len(), 1);
    }
}
