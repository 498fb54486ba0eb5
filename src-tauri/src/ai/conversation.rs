//! Conversation Client
//!
//! A session is a plain value: the grounding instruction plus every turn so
//! far. Each `send_turn` replays the full history, so the backend can stay
//! stateless. The caller's session is never modified; a successful turn
//! returns the extended session alongside the reply.

use super::backend::{GenerateRequest, ModelBackend, Turn};
use super::prompts::build_grounding_instruction;
use crate::error::{DocQueryError, Result};
use crate::language::Language;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    language: Language,
    system_instruction: String,
    history: Vec<Turn>,
    opened_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Language fixed when the session was opened
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    fn request_for(&self, message: &str) -> GenerateRequest {
        let mut turns = self.history.clone();
        turns.push(Turn::user(message));
        GenerateRequest {
            system_instruction: Some(self.system_instruction.clone()),
            turns,
        }
    }
}

/// Reply text plus the session with this exchange appended
#[derive(Debug, Clone)]
pub struct TurnReply {
    pub text: String,
    pub session: ConversationSession,
}

pub struct ConversationClient {
    backend: Arc<dyn ModelBackend>,
}

impl ConversationClient {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Configure a grounded session. No request is sent.
    pub fn open_session(&self, document_text: &str, language: Language) -> Result<ConversationSession> {
        if document_text.trim().is_empty() {
            return Err(DocQueryError::SessionOpenFailed {
                reason: "document text is empty".to_string(),
            });
        }

        let session = ConversationSession {
            id: Uuid::new_v4(),
            language,
            system_instruction: build_grounding_instruction(document_text, language),
            history: Vec::new(),
            opened_at: Utc::now(),
        };

        tracing::info!(
            "[Conversation] Session {} opened ({}, {} chars of context)",
            session.id,
            language.code(),
            document_text.len()
        );

        Ok(session)
    }

    /// Send one user message within `session` and return the model's reply
    pub async fn send_turn(&self, session: &ConversationSession, message: &str) -> Result<TurnReply> {
        tracing::info!(
            "[Conversation] Session {}: sending turn {} ({} chars)",
            session.id,
            session.history.len() / 2 + 1,
            message.len()
        );

        let text = self
            .backend
            .generate(session.request_for(message))
            .await
            .map_err(|e| {
                tracing::error!("[Conversation] Error sending message in {}: {}", session.id, e);
                DocQueryError::TurnFailed {
                    cause: e.to_string(),
                }
            })?;

        let mut next = session.clone();
        next.history.push(Turn::user(message));
        next.history.push(Turn::model(text.clone()));

        Ok(TurnReply {
            text,
            session: next,
        })
    }
}
