//! Workflow Controller
//!
//! Owns all session state and applies every transition synchronously.
//! Network work happens outside, in [`super::Workflow`]; results come back
//! tagged with the epoch (and message id) they were started under, and
//! anything from before the latest reset is dropped.

use super::message::{ChatMessage, MessageId, MessageStatus};
use super::snapshot::{MessageView, WorkflowSnapshot};
use super::state::WorkflowState;
use crate::ai::{ConversationSession, TurnReply};
use crate::error::{DocQueryError, Result};
use crate::language::Language;

/// Bumped on every reset and every new document
pub type Epoch = u64;

/// Output of the startup pipeline
#[derive(Debug, Clone)]
pub struct PreparedDocument {
    pub text: String,
    pub summary: String,
    pub session: ConversationSession,
}

/// A chat turn that has been recorded but not answered
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub epoch: Epoch,
    pub message_id: MessageId,
    pub message: String,
    pub session: ConversationSession,
}

#[derive(Debug, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    language: Language,
    epoch: Epoch,
    next_message_id: u64,
    file_name: Option<String>,
    extracted_text: Option<String>,
    summary: Option<String>,
    session: Option<ConversationSession>,
    messages: Vec<ChatMessage>,
    error: Option<String>,
    draft: String,
    /// A pipeline or turn is still running, even if a reset already hid it
    in_flight: bool,
}

impl WorkflowController {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn session(&self) -> Option<&ConversationSession> {
        self.session.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Applies to the next document; an open session keeps its language
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Mirror of the chat input box
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Start a new document: clear everything from the previous one and enter `Extracting`
    pub fn begin_processing(&mut self, file_name: &str) -> Result<Epoch> {
        self.ensure_idle_hands()?;

        self.clear_session_state();
        self.epoch += 1;
        self.file_name = Some(file_name.to_string());
        self.state = WorkflowState::Extracting;
        self.in_flight = true;

        tracing::info!("[Workflow] Processing {} (epoch {})", file_name, self.epoch);
        Ok(self.epoch)
    }

    /// Advance to the next startup stage. Returns false for a stale epoch.
    pub fn enter_stage(&mut self, epoch: Epoch, stage: WorkflowState) -> bool {
        if epoch != self.epoch || !self.state.is_loading() {
            tracing::debug!("[Workflow] Ignoring stage {} for stale epoch {}", stage, epoch);
            return false;
        }
        tracing::debug!("[Workflow] {} -> {}", self.state, stage);
        self.state = stage;
        true
    }

    /// Apply the pipeline result. Nothing partial is kept on failure.
    pub fn finish_processing(&mut self, epoch: Epoch, result: Result<PreparedDocument>) -> bool {
        self.in_flight = false;
        if epoch != self.epoch || !self.state.is_loading() {
            tracing::info!("[Workflow] Dropping result of superseded epoch {}", epoch);
            return false;
        }

        match result {
            Ok(prepared) => {
                tracing::info!(
                    "[Workflow] Ready: {} chars of text, {} chars of summary, session {}",
                    prepared.text.len(),
                    prepared.summary.len(),
                    prepared.session.id()
                );
                self.extracted_text = Some(prepared.text);
                self.summary = Some(prepared.summary);
                self.session = Some(prepared.session);
                self.state = WorkflowState::Ready;
            }
            Err(err) => {
                tracing::error!("[Workflow] Failed during {}: {}", self.state, err);
                self.extracted_text = None;
                self.summary = None;
                self.session = None;
                self.error = Some(err.user_message());
                self.state = WorkflowState::Errored;
            }
        }
        true
    }

    /// A superseded pipeline stopped between stages without a result
    pub fn abandon_processing(&mut self, epoch: Epoch) {
        tracing::info!("[Workflow] Pipeline for epoch {} superseded", epoch);
        self.in_flight = false;
    }

    /// Record a user message and a pending reply, then hand out what the turn needs
    pub fn begin_turn(&mut self, message: &str) -> Result<PendingTurn> {
        self.ensure_idle_hands()?;

        let session = match (&self.session, self.state) {
            (Some(session), WorkflowState::Ready) => session.clone(),
            _ => {
                return Err(DocQueryError::NotReady {
                    state: self.state.to_string(),
                })
            }
        };

        if message.trim().is_empty() {
            return Err(DocQueryError::EmptyMessage);
        }

        let user_id = self.next_id();
        let reply_id = self.next_id();
        self.messages.push(ChatMessage::user(user_id, message));
        self.messages.push(ChatMessage::pending_reply(reply_id));
        self.draft.clear();
        self.state = WorkflowState::AwaitingReply;
        self.in_flight = true;

        Ok(PendingTurn {
            epoch: self.epoch,
            message_id: reply_id,
            message: message.to_string(),
            session,
        })
    }

    /// Resolve the pending reply by id. Returns false if it no longer exists.
    pub fn finish_turn(&mut self, pending: &PendingTurn, result: Result<TurnReply>) -> bool {
        self.in_flight = false;
        if pending.epoch != self.epoch {
            tracing::info!(
                "[Workflow] Dropping reply {:?} from superseded epoch {}",
                pending.message_id,
                pending.epoch
            );
            return false;
        }

        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == pending.message_id && m.is_pending())
        else {
            tracing::warn!(
                "[Workflow] No pending message {:?} to resolve",
                pending.message_id
            );
            return false;
        };

        match result {
            Ok(reply) => {
                message.status = MessageStatus::Complete(reply.text);
                self.session = Some(reply.session);
            }
            Err(err) => {
                tracing::error!("[Workflow] Chat turn failed: {}", err);
                message.status = MessageStatus::Failed(err.user_message());
            }
        }

        if self.state == WorkflowState::AwaitingReply {
            self.state = WorkflowState::Ready;
        }
        true
    }

    /// Back to `Idle` with nothing retained except the language choice.
    /// Work already running is not cancelled; new submissions stay `Busy`
    /// until it has finished.
    pub fn reset(&mut self) {
        self.clear_session_state();
        self.draft.clear();
        self.epoch += 1;
        self.state = WorkflowState::Idle;
        tracing::info!("[Workflow] Reset (epoch {})", self.epoch);
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            state: self.state,
            is_loading: self.state.is_loading(),
            is_busy: self.state.is_busy(),
            language: self.language,
            file_name: self.file_name.clone(),
            summary: self.summary.clone(),
            summary_html: self.summary.as_deref().map(crate::markdown::to_html),
            messages: self.messages.iter().map(MessageView::from).collect(),
            error: self.error.clone(),
            draft: self.draft.clone(),
            session_id: self.session.as_ref().map(|s| s.id().to_string()),
        }
    }

    fn ensure_idle_hands(&self) -> Result<()> {
        if self.state.is_busy() {
            return Err(DocQueryError::Busy {
                state: self.state.to_string(),
            });
        }
        if self.in_flight {
            return Err(DocQueryError::Busy {
                state: format!("{}, previous request still running", self.state),
            });
        }
        Ok(())
    }

    fn clear_session_state(&mut self) {
        self.file_name = None;
        self.extracted_text = None;
        self.summary = None;
        self.session = None;
        self.messages.clear();
        self.error = None;
    }

    fn next_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId(self.next_message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::backend::testing::ScriptedBackend;
    use crate::ai::ConversationClient;
    use std::sync::Arc;

    fn session() -> ConversationSession {
        ConversationClient::new(Arc::new(ScriptedBackend::new()))
            .open_session("Hello world", Language::En)
            .unwrap()
    }

    fn prepared() -> PreparedDocument {
        PreparedDocument {
            text: "Hello world".to_string(),
            summary: "- A greeting".to_string(),
            session: session(),
        }
    }

    fn ready_controller() -> WorkflowController {
        let mut c = WorkflowController::new(Language::En);
        let epoch = c.begin_processing("notes.txt").unwrap();
        assert!(c.enter_stage(epoch, WorkflowState::Summarizing));
        assert!(c.enter_stage(epoch, WorkflowState::OpeningSession));
        assert!(c.finish_processing(epoch, Ok(prepared())));
        c
    }

    fn reply(pending: &PendingTurn, text: &str) -> TurnReply {
        TurnReply {
            text: text.to_string(),
            session: pending.session.clone(),
        }
    }

    fn assert_initial(c: &WorkflowController) {
        assert_eq!(c.state(), WorkflowState::Idle);
        assert!(c.extracted_text().is_none());
        assert!(c.summary().is_none());
        assert!(c.session().is_none());
        assert!(c.messages().is_empty());
        assert!(c.error().is_none());
        assert_eq!(c.draft(), "");
    }

    #[test]
    fn test_startup_reaches_ready() {
        let c = ready_controller();
        assert_eq!(c.state(), WorkflowState::Ready);
        assert_eq!(c.extracted_text(), Some("Hello world"));
        assert_eq!(c.summary(), Some("- A greeting"));
        assert!(c.session().is_some());
        assert!(c.error().is_none());
    }

    #[test]
    fn test_failure_discards_partial_results() {
        let mut c = WorkflowController::new(Language::En);
        let epoch = c.begin_processing("notes.txt").unwrap();
        c.enter_stage(epoch, WorkflowState::Summarizing);
        c.finish_processing(
            epoch,
            Err(DocQueryError::SummarizationFailed {
                cause: "429".to_string(),
            }),
        );

        assert_eq!(c.state(), WorkflowState::Errored);
        assert_eq!(c.error(), Some(crate::error::SUMMARIZATION_FAILED_MESSAGE));
        assert!(c.extracted_text().is_none());
        assert!(c.summary().is_none());
        assert!(c.session().is_none());
    }

    #[test]
    fn test_new_document_replaces_previous_atomically() {
        let mut c = ready_controller();
        let pending = c.begin_turn("Hi").unwrap();
        c.finish_turn(&pending, Ok(reply(&pending, "Hello")));
        assert_eq!(c.messages().len(), 2);

        c.begin_processing("other.txt").unwrap();
        assert_eq!(c.state(), WorkflowState::Extracting);
        assert!(c.summary().is_none());
        assert!(c.session().is_none());
        assert!(c.messages().is_empty());
        assert!(c.error().is_none());
    }

    #[test]
    fn test_busy_rejects_overlapping_work() {
        let mut c = WorkflowController::new(Language::En);
        c.begin_processing("a.txt").unwrap();
        assert!(matches!(
            c.begin_processing("b.txt"),
            Err(DocQueryError::Busy { .. })
        ));

        let mut c = ready_controller();
        c.begin_turn("first").unwrap();
        assert!(matches!(c.begin_turn("second"), Err(DocQueryError::Busy { .. })));
        assert!(matches!(
            c.begin_processing("b.txt"),
            Err(DocQueryError::Busy { .. })
        ));
        assert_eq!(c.messages().len(), 2);
    }

    #[test]
    fn test_chat_requires_ready_and_text() {
        let mut c = WorkflowController::new(Language::En);
        assert!(matches!(c.begin_turn("hello"), Err(DocQueryError::NotReady { .. })));

        let mut c = ready_controller();
        c.set_draft("   ");
        assert!(matches!(c.begin_turn("   "), Err(DocQueryError::EmptyMessage)));
        assert!(c.messages().is_empty());
        assert_eq!(c.state(), WorkflowState::Ready);
        // A rejected message keeps the typed draft
        assert_eq!(c.draft(), "   ");

        let pending = c.begin_turn("first").unwrap();
        c.set_draft("second question");
        assert!(matches!(c.begin_turn("second question"), Err(DocQueryError::Busy { .. })));
        assert_eq!(c.draft(), "second question");
        c.finish_turn(&pending, Ok(reply(&pending, "ok")));
    }

    #[test]
    fn test_begin_turn_appends_user_and_placeholder() {
        let mut c = ready_controller();
        c.set_draft("What does it say?");
        let pending = c.begin_turn("What does it say?").unwrap();

        assert_eq!(c.state(), WorkflowState::AwaitingReply);
        assert_eq!(c.draft(), "");
        assert_eq!(c.messages().len(), 2);
        assert_eq!(c.messages()[0].role, crate::ai::Role::User);
        assert_eq!(c.messages()[0].content(), "What does it say?");
        assert_eq!(c.messages()[1].id, pending.message_id);
        assert!(c.messages()[1].is_pending());
    }

    #[test]
    fn test_successful_turn_only_touches_placeholder() {
        let mut c = ready_controller();
        let pending = c.begin_turn("What does it say?").unwrap();
        let user_before = c.messages()[0].clone();

        assert!(c.finish_turn(&pending, Ok(reply(&pending, "It says hello."))));

        assert_eq!(c.state(), WorkflowState::Ready);
        assert_eq!(c.messages().len(), 2);
        assert_eq!(c.messages()[0].status, user_before.status);
        assert_eq!(c.messages()[0].id, user_before.id);
        assert_eq!(
            c.messages()[1].status,
            MessageStatus::Complete("It says hello.".to_string())
        );
    }

    #[test]
    fn test_failed_turn_rewrites_placeholder_only() {
        let mut c = ready_controller();
        let pending = c.begin_turn("Question").unwrap();
        let len_after_submit = c.messages().len();

        c.finish_turn(
            &pending,
            Err(DocQueryError::TurnFailed {
                cause: "timeout".to_string(),
            }),
        );

        assert_eq!(c.state(), WorkflowState::Ready);
        assert_eq!(c.messages().len(), len_after_submit);
        assert_eq!(c.messages()[0].content(), "Question");
        assert_eq!(
            c.messages()[1].content(),
            format!("Error: {}", crate::error::TURN_FAILED_MESSAGE)
        );
        assert!(c.session().is_some());
    }

    #[test]
    fn test_reset_from_every_state() {
        // Ready
        let mut c = ready_controller();
        c.set_draft("half-typed");
        c.reset();
        assert_initial(&c);

        // Errored
        let mut c = WorkflowController::new(Language::En);
        let epoch = c.begin_processing("x.png").unwrap();
        c.finish_processing(
            epoch,
            Err(DocQueryError::UnsupportedFormat {
                declared: "image/png".to_string(),
            }),
        );
        assert_eq!(c.state(), WorkflowState::Errored);
        c.reset();
        assert_initial(&c);

        // Mid-chat
        let mut c = ready_controller();
        c.begin_turn("Question").unwrap();
        c.reset();
        assert_initial(&c);

        // Mid-startup
        let mut c = WorkflowController::new(Language::En);
        c.begin_processing("notes.txt").unwrap();
        c.reset();
        assert_initial(&c);
    }

    #[test]
    fn test_reset_does_not_release_running_work() {
        let mut c = WorkflowController::new(Language::En);
        let epoch = c.begin_processing("notes.txt").unwrap();
        c.reset();
        assert!(c.in_flight());
        assert!(matches!(
            c.begin_processing("other.txt"),
            Err(DocQueryError::Busy { .. })
        ));

        // The stale result is dropped but frees the controller
        assert!(!c.finish_processing(epoch, Ok(prepared())));
        assert!(!c.in_flight());
        assert_initial(&c);
        c.begin_processing("other.txt").unwrap();

        let mut c = ready_controller();
        let pending = c.begin_turn("Question").unwrap();
        c.reset();
        assert!(matches!(
            c.begin_processing("other.txt"),
            Err(DocQueryError::Busy { .. })
        ));
        c.finish_turn(&pending, Ok(reply(&pending, "late")));
        c.begin_processing("other.txt").unwrap();
    }

    #[test]
    fn test_abandoned_pipeline_releases_controller() {
        let mut c = WorkflowController::new(Language::En);
        let epoch = c.begin_processing("notes.txt").unwrap();
        c.reset();
        assert!(!c.enter_stage(epoch, WorkflowState::Summarizing));
        c.abandon_processing(epoch);
        assert!(!c.in_flight());
        c.begin_processing("other.txt").unwrap();
    }

    #[test]
    fn test_reset_keeps_language() {
        let mut c = ready_controller();
        c.set_language(Language::Ru);
        c.reset();
        assert_eq!(c.language(), Language::Ru);
    }

    #[test]
    fn test_stale_results_are_dropped_after_reset() {
        let mut c = WorkflowController::new(Language::En);
        let epoch = c.begin_processing("notes.txt").unwrap();
        c.reset();
        assert!(!c.enter_stage(epoch, WorkflowState::Summarizing));
        assert!(!c.finish_processing(epoch, Ok(prepared())));
        assert_initial(&c);

        let mut c = ready_controller();
        let pending = c.begin_turn("Question").unwrap();
        c.reset();
        assert!(!c.finish_turn(&pending, Ok(reply(&pending, "late"))));
        assert_initial(&c);
    }

    #[test]
    fn test_language_change_does_not_touch_open_session() {
        let mut c = ready_controller();
        c.set_language(Language::Uz);
        assert_eq!(c.session().unwrap().language(), Language::En);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut c = ready_controller();
        let pending = c.begin_turn("Hi").unwrap();
        let snap = c.snapshot();
        assert_eq!(snap.state, WorkflowState::AwaitingReply);
        assert!(snap.is_busy);
        assert!(!snap.is_loading);
        assert_eq!(snap.file_name.as_deref(), Some("notes.txt"));
        assert_eq!(snap.messages.len(), 2);
        assert_eq!(snap.messages[1].status, "pending");
        assert_eq!(snap.messages[1].id, pending.message_id);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"], "awaitingReply");
        assert_eq!(json["isBusy"], true);
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json["messages"][0]["html"].is_null());
        assert!(json["summaryHtml"].as_str().unwrap().contains("<li>A greeting</li>"));
    }
}
