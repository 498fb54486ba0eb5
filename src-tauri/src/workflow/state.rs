use serde::Serialize;
use std::fmt;

/// Workflow states.
///
/// ```text
/// Idle -> Extracting -> Summarizing -> OpeningSession -> Ready <-> AwaitingReply
///             |              |               |
///             +--------------+---------------+--> Errored
/// ```
/// `reset` returns to `Idle` from anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowState {
    #[default]
    Idle,
    Extracting,
    Summarizing,
    OpeningSession,
    Ready,
    AwaitingReply,
    Errored,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Summarizing => "summarizing",
            Self::OpeningSession => "openingSession",
            Self::Ready => "ready",
            Self::AwaitingReply => "awaitingReply",
            Self::Errored => "errored",
        }
    }

    /// A startup stage is running
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::Extracting | Self::Summarizing | Self::OpeningSession
        )
    }

    /// Something is in flight; new submissions are refused
    pub fn is_busy(&self) -> bool {
        self.is_loading() || *self == Self::AwaitingReply
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
