// Conversation state owned by a session synchronizer

use serde::Serialize;

use crate::api::{ApiError, ChatReply, ConversationHistory, SessionInfo};
use crate::models::steps::{clamp_step, is_terminal_step};
use crate::models::{ChatMessage, CollectedData, Dimensions, DEFAULT_DIMENSIONS, FIRST_STEP};

/// Everything the studio knows about the current conversation.
///
/// `box_dimensions` only moves when the assistant sends a dimensions object;
/// once it has, `has_chatbot_dimensions` stays set until reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub messages: Vec<ChatMessage>,
    pub session_id: Option<String>,
    pub current_step: u8,
    pub collected_data: CollectedData,
    pub box_dimensions: Dimensions,
    pub has_chatbot_dimensions: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_complete: bool,
    pub is_waiting_confirmation: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            session_id: None,
            current_step: FIRST_STEP,
            collected_data: CollectedData::default(),
            box_dimensions: DEFAULT_DIMENSIONS,
            has_chatbot_dimensions: false,
            is_loading: false,
            error: None,
            is_complete: false,
            is_waiting_confirmation: false,
        }
    }
}

impl ChatState {
    /// Append the user's message and enter the loading state
    pub(crate) fn begin_send(&mut self, text: &str, request_id: &str) {
        self.messages.push(ChatMessage::user(text, request_id));
        self.is_loading = true;
        self.error = None;
    }

    /// Adopt the server's view of the session and append its reply
    pub(crate) fn apply_reply(&mut self, reply: ChatReply, request_id: &str) {
        let step = clamp_step(reply.current_step);
        if step < self.current_step {
            // Editing from a checkpoint sends the assistant back
            log::debug!(
                "Assistant moved from step {} back to step {}",
                self.current_step,
                step
            );
        }

        self.session_id = Some(reply.session_id);
        self.current_step = step;
        self.is_complete = self.is_complete || reply.is_complete || is_terminal_step(step);
        self.is_waiting_confirmation = reply.is_waiting_confirmation;
        self.adopt_collected(reply.collected_data);
        self.messages
            .push(ChatMessage::assistant(reply.response, step, Some(request_id)));
        self.is_loading = false;
    }

    /// Keep the user's message and explain the failure in the transcript
    pub(crate) fn record_failure(&mut self, err: &ApiError, request_id: &str) {
        self.messages.push(ChatMessage::send_failure(request_id));
        self.error = Some(err.to_string());
        self.is_loading = false;
    }

    /// Replace local state with a session fetched from the backend
    pub(crate) fn restore(&mut self, info: SessionInfo, history: ConversationHistory) {
        let step = clamp_step(info.current_step);
        *self = ChatState {
            session_id: Some(info.session_id),
            current_step: step,
            is_complete: info.is_complete || is_terminal_step(step),
            messages: history
                .messages
                .into_iter()
                .map(|entry| ChatMessage::from_history(entry.role, entry.content))
                .collect(),
            ..ChatState::default()
        };
        self.adopt_collected(info.collected_data);
    }

    fn adopt_collected(&mut self, collected: CollectedData) {
        if let Some(dimensions) = collected.dimensions {
            self.box_dimensions = dimensions.normalize();
            self.has_chatbot_dimensions = true;
        }
        self.collected_data = collected;
    }

    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
