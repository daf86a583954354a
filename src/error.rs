use std::path::PathBuf;

/// Errors surfaced by the genetics and training core.
#[derive(Debug, thiserror::Error)]
pub enum EmbryoError {
    #[error("unknown training program: {0}")]
    UnknownProgram(String),
    #[error("malformed record at {path}: {reason}")]
    MalformedRecord { path: PathBuf, reason: String },
    #[error("no agent registered for embryo id: {0}")]
    AgentNotFound(String),
    #[error("agent collaborator failed: {0}")]
    Agent(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EmbryoError>;
