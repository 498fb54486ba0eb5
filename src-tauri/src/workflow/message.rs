//! Chat history entries
//!
//! Model replies start `Pending` and are resolved by id, never by position.

use crate::ai::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageStatus {
    Pending,
    Complete(String),
    /// Holds the user-facing reason; rendered with an `Error: ` prefix
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            status: MessageStatus::Complete(text.into()),
            created_at: Utc::now(),
        }
    }

    /// Placeholder for a reply that has not arrived yet
    pub fn pending_reply(id: MessageId) -> Self {
        Self {
            id,
            role: Role::Model,
            status: MessageStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    /// Text to display; empty while pending
    pub fn content(&self) -> String {
        match &self.status {
            MessageStatus::Pending => String::new(),
            MessageStatus::Complete(text) => text.clone(),
            MessageStatus::Failed(reason) => format!("Error: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_by_status() {
        let mut msg = ChatMessage::pending_reply(MessageId(2));
        assert!(msg.is_pending());
        assert_eq!(msg.content(), "");

        msg.status = MessageStatus::Failed("Failed to get a response from the model.".into());
        assert_eq!(
            msg.content(),
            "Error: Failed to get a response from the model."
        );

        let user = ChatMessage::user(MessageId(1), "Hi");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content(), "Hi");
        assert!(!user.is_pending());
    }
}
