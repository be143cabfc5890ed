use std::io;
use std::path::PathBuf;

/// Errors that can occur while resolving a workspace or executing actions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse workspace snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Input aborted")]
    Aborted,
}

/// Result type alias for strz operations
pub type Result<T> = std::result::Result<T, Error>;
