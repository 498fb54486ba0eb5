//! Workflow Tauri commands
//!
//! Every command returns the current snapshot. Progress is also pushed as it
//! happens:
//! - workflow:state - WorkflowSnapshot - after every transition

use crate::document::UploadedDocument;
use crate::error::DocQueryError;
use crate::language::{Language, LanguageOption};
use crate::workflow::{Workflow, WorkflowSnapshot};
use serde::Deserialize;
use std::sync::Arc;
use tauri::{AppHandle, Emitter, State};

pub const STATE_EVENT: &str = "workflow:state";

/// Managed workflow shared by all commands
pub struct AppWorkflow(pub Arc<Workflow>);

/// File chosen in the upload panel
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocumentRequest {
    pub file_name: String,
    #[serde(default)]
    pub media_type: String,
    pub bytes: Vec<u8>,
}

fn emitter(app: AppHandle) -> impl Fn(&WorkflowSnapshot) + Send + Sync {
    move |snapshot: &WorkflowSnapshot| {
        if let Err(e) = app.emit(STATE_EVENT, snapshot) {
            tracing::warn!("[WorkflowCommand] Failed to emit {}: {}", STATE_EVENT, e);
        }
    }
}

fn to_user_error(err: DocQueryError) -> String {
    tracing::warn!("[WorkflowCommand] Rejected: {}", err);
    err.user_message()
}

/// Extract, summarize and open a chat session for an uploaded document
#[tauri::command]
pub async fn process_document(
    app: AppHandle,
    workflow: State<'_, AppWorkflow>,
    request: ProcessDocumentRequest,
) -> Result<WorkflowSnapshot, String> {
    tracing::info!(
        "[WorkflowCommand] process_document: {} ({} bytes, type {:?})",
        request.file_name,
        request.bytes.len(),
        request.media_type
    );

    let document = UploadedDocument::new(request.bytes, request.media_type, request.file_name);
    let workflow = Arc::clone(&workflow.0);
    workflow
        .submit_document(document, emitter(app))
        .await
        .map_err(to_user_error)
}

/// Ask one question about the current document
#[tauri::command]
pub async fn send_chat_message(
    app: AppHandle,
    workflow: State<'_, AppWorkflow>,
    message: String,
) -> Result<WorkflowSnapshot, String> {
    let workflow = Arc::clone(&workflow.0);
    workflow
        .submit_chat(&message, emitter(app))
        .await
        .map_err(to_user_error)
}

#[tauri::command]
pub async fn set_chat_draft(
    workflow: State<'_, AppWorkflow>,
    draft: String,
) -> Result<WorkflowSnapshot, String> {
    Ok(workflow.0.set_draft(&draft).await)
}

/// Discard the document, summary and chat
#[tauri::command]
pub async fn reset_workflow(
    app: AppHandle,
    workflow: State<'_, AppWorkflow>,
) -> Result<WorkflowSnapshot, String> {
    let snapshot = workflow.0.reset().await;
    emitter(app)(&snapshot);
    Ok(snapshot)
}

/// Language for the next summary and session
#[tauri::command]
pub async fn set_language(
    app: AppHandle,
    workflow: State<'_, AppWorkflow>,
    language: String,
) -> Result<WorkflowSnapshot, String> {
    let snapshot = workflow.0.set_language(Language::from_code(&language)).await;
    emitter(app)(&snapshot);
    Ok(snapshot)
}

#[tauri::command]
pub async fn get_workflow_state(
    workflow: State<'_, AppWorkflow>,
) -> Result<WorkflowSnapshot, String> {
    Ok(workflow.0.snapshot().await)
}

#[tauri::command]
pub fn list_languages() -> Vec<LanguageOption> {
    Language::options()
}
