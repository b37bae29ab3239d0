//! Assistant conversation messages

use chrono::{DateTime, Utc};

/// Who authored a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One turn in the assistant conversation.
///
/// A model reply starts as an empty placeholder and is filled while the
/// stream arrives, so `text` may transiently be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_error: bool,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }

    pub fn placeholder() -> Self {
        Self::new(ChatRole::Model, String::new())
    }

    pub fn error(text: impl Into<String>) -> Self {
        let mut msg = Self::new(ChatRole::Model, text);
        msg.is_error = true;
        msg
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}
