// Chat Models - transcript messages exchanged with the quotation assistant

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Message Role Enum
// ============================================================================

/// Role of a transcript message.
/// Serializes/deserializes as lowercase strings to match the backend payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" | "bot" => Ok(MessageRole::Assistant),
            _ => Err(format!(
                "Invalid message role: '{}'. Expected 'user' or 'assistant'",
                s
            )),
        }
    }
}

// ============================================================================
// Transcript Message
// ============================================================================

/// Text shown in place of an assistant reply when a send fails
pub const SEND_FAILURE_NOTICE: &str =
    "Sorry, we could not reach the quotation assistant. Please send your message again.";

/// A message in the local transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: String,
    /// Step the assistant was on when it produced this reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u8>,
    /// Synthetic assistant bubble standing in for a failed send
    #[serde(default)]
    pub is_error: bool,
    /// Correlates a user message with the reply (or failure) it produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            step: None,
            is_error: false,
            request_id: None,
        }
    }

    /// User message appended optimistically before the backend answers
    pub fn user(content: impl Into<String>, request_id: &str) -> Self {
        let mut msg = Self::new(MessageRole::User, content);
        msg.request_id = Some(request_id.to_string());
        msg
    }

    /// Assistant reply tagged with the step it was produced at
    pub fn assistant(content: impl Into<String>, step: u8, request_id: Option<&str>) -> Self {
        let mut msg = Self::new(MessageRole::Assistant, content);
        msg.step = Some(step);
        msg.request_id = request_id.map(String::from);
        msg
    }

    /// Error-flagged assistant bubble used when a send fails
    pub fn send_failure(request_id: &str) -> Self {
        let mut msg = Self::new(MessageRole::Assistant, SEND_FAILURE_NOTICE);
        msg.is_error = true;
        msg.request_id = Some(request_id.to_string());
        msg
    }

    /// Rebuild a transcript entry from a history record returned by the backend
    pub fn from_history(role: MessageRole, content: String) -> Self {
        Self::new(role, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_as_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert_eq!("USER".parse::<MessageRole>().unwrap(), MessageRole::User);
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_send_failure_is_flagged() {
        let msg = ChatMessage::send_failure("req-1");
        assert_eq!(msg.role, MessageRole::Assistant);
        assert!(msg.is_error);
        assert_eq!(msg.request_id.as_deref(), Some("req-1"));
        assert!(msg.step.is_none());
    }

    #[test]
    fn test_assistant_carries_step() {
        let msg = ChatMessage::assistant("hello", 3, None);
        assert_eq!(msg.step, Some(3));
        assert!(!msg.is_error);
    }
}
