//! 对局错误处理模块
//!
//! Errors raised while setting up or resolving a duel: malformed stats,
//! unwired collaborators, rejected turn requests and configuration problems.

use thiserror::Error;

/// Errors a duel can produce.
#[derive(Debug, Error)]
pub enum DuelError {
    /// A stat needed for an attack is absent or not an integer.
    /// The attack is skipped and the match state is left untouched.
    #[error("Invalid stats for player {combatant}: {field} {reason}")]
    InvalidStats {
        combatant: u8,
        field: &'static str,
        reason: String,
    },

    /// A collaborator was not supplied when the engine was built.
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A turn is already resolving; the request is ignored.
    #[error("A turn is already resolving")]
    Busy,

    /// The match is over; no further turns are accepted.
    #[error("The match is already over")]
    MatchOver,

    /// Configuration could not be understood.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO操作错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DuelError {
    /// Whether this error should be dropped without telling the player.
    pub fn is_silent(&self) -> bool {
        matches!(self, DuelError::Busy | DuelError::MatchOver)
    }

    /// Whether the engine cannot run at all after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DuelError::MissingCollaborator(_) | DuelError::Config(_) | DuelError::Io(_)
        )
    }
}

impl From<serde_json::Error> for DuelError {
    fn from(err: serde_json::Error) -> Self {
        DuelError::Config(err.to_string())
    }
}

/// 处理对局错误并转换为用户友好的消息
pub fn handle_error(error: &DuelError) -> String {
    match error {
        DuelError::InvalidStats {
            combatant,
            field,
            reason,
        } => format!("Player {}'s {} {}, attack skipped", combatant, field, reason),
        DuelError::MissingCollaborator(what) => {
            format!("Duel cannot start: no {} was provided", what)
        }
        DuelError::Io(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Config file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "No permission to read config file".to_string(),
            _ => format!("IO error: {}", e),
        },
        _ => error.to_string(),
    }
}
