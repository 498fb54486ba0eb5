//! Summarization Client
//!
//! One request per document, no streaming and no retry. Backend failures are
//! logged in full and collapsed into `SummarizationFailed`.

use super::backend::{GenerateRequest, ModelBackend};
use super::prompts::build_summary_prompt;
use crate::error::{DocQueryError, Result};
use crate::language::Language;
use std::sync::Arc;

pub struct Summarizer {
    backend: Arc<dyn ModelBackend>,
}

impl Summarizer {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Produce a markdown summary of `text` in `language`
    pub async fn summarize(&self, text: &str, language: Language) -> Result<String> {
        let prompt = build_summary_prompt(text, language);

        tracing::info!(
            "[Summarizer] Requesting {} summary of {} chars from {}",
            language.code(),
            text.len(),
            self.backend.model_name()
        );

        match self.backend.generate(GenerateRequest::prompt(prompt)).await {
            Ok(summary) if !summary.trim().is_empty() => {
                tracing::info!("[Summarizer] Summary ready: {} chars", summary.len());
                Ok(summary)
            }
            Ok(_) => {
                tracing::error!("[Summarizer] Model returned an empty summary");
                Err(DocQueryError::SummarizationFailed {
                    cause: "empty summary".to_string(),
                })
            }
            Err(e) => {
                tracing::error!("[Summarizer] Error summarizing text: {}", e);
                Err(DocQueryError::SummarizationFailed {
                    cause: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::backend::testing::ScriptedBackend;
    use crate::error::SUMMARIZATION_FAILED_MESSAGE;

    #[tokio::test]
    async fn test_summary_uses_single_prompt() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_reply("- Greets the world");

        let summarizer = Summarizer::new(backend.clone());
        let summary = summarizer.summarize("Hello world", Language::Uz).await.unwrap();
        assert_eq!(summary, "- Greets the world");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].system_instruction.is_none());
        assert_eq!(requests[0].turns.len(), 1);
        assert!(requests[0].turns[0].text.contains("Oʻzbekcha"));
        assert!(requests[0].turns[0].text.ends_with("Hello world"));
    }

    #[tokio::test]
    async fn test_backend_failure_is_generic_for_users() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_failure("RESOURCE_EXHAUSTED: quota");

        let err = Summarizer::new(backend)
            .summarize("text", Language::En)
            .await
            .unwrap_err();

        assert!(matches!(err, DocQueryError::SummarizationFailed { .. }));
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED"));
        assert_eq!(err.user_message(), SUMMARIZATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_blank_summary_is_a_failure() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_reply("   ");

        let err = Summarizer::new(backend)
            .summarize("text", Language::En)
            .await
            .unwrap_err();
        assert!(matches!(err, DocQueryError::SummarizationFailed { .. }));
    }
}
