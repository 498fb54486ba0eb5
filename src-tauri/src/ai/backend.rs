//! Language-model backend seam
//!
//! Everything that talks to a hosted model goes through [`ModelBackend`].
//! Requests are stateless: conversation history is replayed by the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// One message in a model conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Input for a single generation call
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub system_instruction: Option<String>,
    /// Ordered, oldest first; the last turn is the one being answered
    pub turns: Vec<Turn>,
}

impl GenerateRequest {
    /// One-shot prompt without system instruction
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            turns: vec![Turn::user(text)],
        }
    }
}

/// Transport and API failures. Logged, never shown to users.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("prompt blocked: {0}")]
    Blocked(String),

    #[error("empty response (finish reason: {0})")]
    EmptyResponse(String),
}

#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Model identifier, for logs
    fn model_name(&self) -> &str;

    /// Generate the next model turn
    async fn generate(&self, request: GenerateRequest) -> Result<String, BackendError>;
}
