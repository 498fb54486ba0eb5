pub mod ai;
pub mod config;
pub mod document;
pub mod error;
pub mod language;
pub mod markdown;
pub mod workflow;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use ai::{GeminiClient, ModelBackend};
    use commands::*;
    use config::AppConfig;
    use language::Language;
    use std::sync::Arc;
    use tracing_subscriber::EnvFilter;
    use workflow::{Workflow, WorkflowServices};

    // Load .env file - try multiple locations
    // During `tauri dev`, CWD is project root; check current dir first
    if dotenvy::dotenv().is_err() {
        // Fallback: check parent directory (if running from src-tauri)
        let _ = dotenvy::from_path("../.env");
    }

    // Default: warn for most crates, info for our app (stage transitions visible)
    // Use RUST_LOG=debug for verbose per-stage logs
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,docquery_lib=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Startup failed: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };
    tracing::info!("Loaded configuration: {:?}", config);

    let backend: Arc<dyn ModelBackend> = match GeminiClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to create model client: {}", e);
            std::process::exit(1);
        }
    };

    let workflow = Workflow::new(WorkflowServices::new(backend), Language::default());

    tauri::Builder::default()
        .manage(AppWorkflow(Arc::new(workflow)))
        .invoke_handler(tauri::generate_handler![
            process_document,
            send_chat_message,
            set_chat_draft,
            reset_workflow,
            set_language,
            get_workflow_state,
            list_languages,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
