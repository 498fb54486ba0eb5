//! Model-backed stages of the workflow
//!
//! ```text
//! ModelBackend (trait)  <-  GeminiClient (reqwest)
//!        ^
//!        +-- Summarizer          one-shot summary
//!        +-- ConversationClient  grounded, replayed chat
//! ```

pub mod backend;
pub mod client;
pub mod conversation;
pub mod prompts;
pub mod summarizer;

pub use backend::{BackendError, GenerateRequest, ModelBackend, Role, Turn};
pub use client::GeminiClient;
pub use conversation::{ConversationClient, ConversationSession, TurnReply};
pub use summarizer::Summarizer;
