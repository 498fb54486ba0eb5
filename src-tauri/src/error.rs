//! Error types shared by the extraction, AI and workflow layers.
//!
//! `Display` carries the full diagnostic detail and is what gets logged.
//! `user_message()` is the short text the frontend shows.

use thiserror::Error;

/// Message shown in the chat bubble when a turn fails
pub const TURN_FAILED_MESSAGE: &str = "Failed to get a response from the model.";

/// Message shown in the error panel when summarization fails
pub const SUMMARIZATION_FAILED_MESSAGE: &str =
    "Failed to generate summary. The model may have refused to respond.";

#[derive(Debug, Error)]
pub enum DocQueryError {
    /// Neither the declared media type nor the file extension is supported
    #[error("unsupported file type: {declared}")]
    UnsupportedFormat { declared: String },

    /// The parser for this format was not compiled into this build
    #[error("{library} support is not available in this build")]
    DependencyUnavailable { library: &'static str },

    /// The parser ran but could not read the document
    #[error("failed to extract text from {file_name}: {reason}")]
    ExtractionFailed { file_name: String, reason: String },

    /// Parsing succeeded but produced no text (scanned PDF, empty file)
    #[error("no extractable text in {file_name}")]
    NoExtractableText { file_name: String },

    #[error("summarization failed: {cause}")]
    SummarizationFailed { cause: String },

    #[error("could not open conversation session: {reason}")]
    SessionOpenFailed { reason: String },

    #[error("chat turn failed: {cause}")]
    TurnFailed { cause: String },

    /// No API key in the environment
    #[error("no API key configured (checked {checked})")]
    MissingCredential { checked: String },

    #[error("invalid configuration value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// A stage or chat turn is already in flight
    #[error("a request is already in progress (state: {state})")]
    Busy { state: String },

    /// Chat submitted without an open session
    #[error("no conversation is ready (state: {state})")]
    NotReady { state: String },

    #[error("chat message is empty")]
    EmptyMessage,
}

impl DocQueryError {
    /// Short, user-facing description. Never includes backend payloads.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedFormat { declared } => format!(
                "Unsupported file type: \"{}\". Please upload a PDF, DOCX, or TXT file.",
                declared
            ),
            Self::DependencyUnavailable { library } => format!(
                "{} documents cannot be read by this version of the app.",
                library
            ),
            Self::ExtractionFailed { .. } => {
                "The document could not be read. It may be damaged or password-protected."
                    .to_string()
            }
            Self::NoExtractableText { .. } => {
                "No text could be found in the document. Scanned or image-only files are not supported."
                    .to_string()
            }
            Self::SummarizationFailed { .. } => SUMMARIZATION_FAILED_MESSAGE.to_string(),
            Self::SessionOpenFailed { .. } => {
                "Failed to start a conversation about the document.".to_string()
            }
            Self::TurnFailed { .. } => TURN_FAILED_MESSAGE.to_string(),
            Self::MissingCredential { .. } => {
                "No API key found. Set GEMINI_API_KEY in the environment or .env file.".to_string()
            }
            Self::InvalidConfig { key, .. } => format!("Invalid configuration value for {}.", key),
            Self::Busy { .. } => "Please wait for the current request to finish.".to_string(),
            Self::NotReady { .. } => "Upload a document before asking questions.".to_string(),
            Self::EmptyMessage => "Type a question first.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocQueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_cause() {
        let err = DocQueryError::TurnFailed {
            cause: "HTTP 429: quota exceeded for project 1234".to_string(),
        };
        assert_eq!(err.user_message(), TURN_FAILED_MESSAGE);
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_unsupported_format_names_type() {
        let err = DocQueryError::UnsupportedFormat {
            declared: "image/png".to_string(),
        };
        assert!(err.user_message().contains("\"image/png\""));
    }
}
