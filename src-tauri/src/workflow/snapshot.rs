use super::message::{ChatMessage, MessageId, MessageStatus};
use super::state::WorkflowState;
use crate::ai::Role;
use crate::language::Language;
use crate::markdown;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the frontend renders, sent with every state change
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSnapshot {
    pub state: WorkflowState,
    /// Startup stage running; the UI shows the loader and disables upload
    pub is_loading: bool,
    /// Anything in flight; the UI disables every submit control
    pub is_busy: bool,
    pub language: Language,
    pub file_name: Option<String>,
    pub summary: Option<String>,
    /// `summary` rendered from markdown
    pub summary_html: Option<String>,
    pub messages: Vec<MessageView>,
    pub error: Option<String>,
    pub draft: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: MessageId,
    pub role: Role,
    pub status: &'static str,
    pub content: String,
    /// Rendered markdown for completed model replies
    pub html: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            role: message.role,
            status: match message.status {
                MessageStatus::Pending => "pending",
                MessageStatus::Complete(_) => "complete",
                MessageStatus::Failed(_) => "failed",
            },
            content: message.content(),
            html: match (&message.role, &message.status) {
                (Role::Model, MessageStatus::Complete(text)) => Some(markdown::to_html(text)),
                _ => None,
            },
            created_at: message.created_at,
        }
    }
}
