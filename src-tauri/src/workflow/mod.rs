//! Upload → summary → chat workflow
//!
//! [`WorkflowController`] holds the state and applies transitions.
//! [`Workflow`] drives it: it takes the lock only to transition, runs
//! extraction and model calls without it, and reports every change through a
//! snapshot callback.

mod controller;
mod message;
mod snapshot;
mod state;


pub use controller::{Epoch, PendingTurn, PreparedDocument, WorkflowController};
pub use message::{ChatMessage, MessageId, MessageStatus};
pub use snapshot::{MessageView, WorkflowSnapshot};
pub use state::WorkflowState;

use crate::ai::{ConversationClient, ModelBackend, Summarizer};
use crate::document::{DocumentExtractor, UploadedDocument};
use crate::error::Result;
use crate::language::Language;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The three stage clients, sharing one backend
pub struct WorkflowServices {
    pub extractor: DocumentExtractor,
    pub summarizer: Summarizer,
    pub conversation: ConversationClient,
}

impl WorkflowServices {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            extractor: DocumentExtractor::new(),
            summarizer: Summarizer::new(Arc::clone(&backend)),
            conversation: ConversationClient::new(backend),
        }
    }
}

pub struct Workflow {
    services: WorkflowServices,
    controller: Mutex<WorkflowController>,
}

impl Workflow {
    pub fn new(services: WorkflowServices, language: Language) -> Self {
        Self {
            services,
            controller: Mutex::new(WorkflowController::new(language)),
        }
    }

    /// Run extraction, summarization and session setup for a new document.
    ///
    /// Returns the final snapshot. `Err` only for a rejected submission
    /// (`Busy`, also while work from before a reset is still running);
    /// stage failures land in the snapshot as `Errored`.
    pub async fn submit_document<F>(
        &self,
        document: UploadedDocument,
        on_change: F,
    ) -> Result<WorkflowSnapshot>
    where
        F: Fn(&WorkflowSnapshot) + Send + Sync,
    {
        let (epoch, language) = {
            let mut controller = self.controller.lock().await;
            let epoch = controller.begin_processing(&document.file_name)?;
            on_change(&controller.snapshot());
            (epoch, controller.language())
        };

        let result = match self.prepare(epoch, document, language, &on_change).await {
            Ok(Some(prepared)) => Ok(prepared),
            Ok(None) => {
                let mut controller = self.controller.lock().await;
                controller.abandon_processing(epoch);
                return Ok(controller.snapshot());
            }
            Err(err) => Err(err),
        };

        let mut controller = self.controller.lock().await;
        if controller.finish_processing(epoch, result) {
            on_change(&controller.snapshot());
        }
        Ok(controller.snapshot())
    }

    /// `Ok(None)` when a reset or newer document took over between stages
    async fn prepare<F>(
        &self,
        epoch: Epoch,
        document: UploadedDocument,
        language: Language,
        on_change: &F,
    ) -> Result<Option<PreparedDocument>>
    where
        F: Fn(&WorkflowSnapshot) + Send + Sync,
    {
        let extracted = self.services.extractor.extract(document).await?;

        if !self.advance(epoch, WorkflowState::Summarizing, on_change).await {
            return Ok(None);
        }
        let summary = self
            .services
            .summarizer
            .summarize(&extracted.text, language)
            .await?;

        if !self.advance(epoch, WorkflowState::OpeningSession, on_change).await {
            return Ok(None);
        }
        let session = self
            .services
            .conversation
            .open_session(&extracted.text, language)?;

        Ok(Some(PreparedDocument {
            text: extracted.text,
            summary,
            session,
        }))
    }

    async fn advance<F>(&self, epoch: Epoch, stage: WorkflowState, on_change: &F) -> bool
    where
        F: Fn(&WorkflowSnapshot) + Send + Sync,
    {
        let mut controller = self.controller.lock().await;
        let current = controller.enter_stage(epoch, stage);
        if current {
            on_change(&controller.snapshot());
        }
        current
    }

    /// Send one chat message and resolve its placeholder.
    ///
    /// `Err` for a rejected submission (`Busy`, `NotReady`, `EmptyMessage`);
    /// a failed turn lands in the snapshot as a `Failed` message.
    pub async fn submit_chat<F>(&self, message: &str, on_change: F) -> Result<WorkflowSnapshot>
    where
        F: Fn(&WorkflowSnapshot) + Send + Sync,
    {
        let pending = {
            let mut controller = self.controller.lock().await;
            let pending = controller.begin_turn(message)?;
            on_change(&controller.snapshot());
            pending
        };

        let result = self
            .services
            .conversation
            .send_turn(&pending.session, &pending.message)
            .await;

        let mut controller = self.controller.lock().await;
        if controller.finish_turn(&pending, result) {
            on_change(&controller.snapshot());
        }
        Ok(controller.snapshot())
    }

    pub async fn reset(&self) -> WorkflowSnapshot {
        let mut controller = self.controller.lock().await;
        controller.reset();
        controller.snapshot()
    }

    pub async fn set_language(&self, language: Language) -> WorkflowSnapshot {
        let mut controller = self.controller.lock().await;
        controller.set_language(language);
        controller.snapshot()
    }

    pub async fn set_draft(&self, draft: &str) -> WorkflowSnapshot {
        let mut controller = self.controller.lock().await;
        controller.set_draft(draft);
        controller.snapshot()
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.controller.lock().await.snapshot()
    }
}
