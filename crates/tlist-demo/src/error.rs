use std::path::PathBuf;

use thiserror::Error;
use tlist_core::ListError;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    List(#[from] ListError),

    #[error("cannot read script {path}: {source}")]
    ScriptFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Script { line: usize, message: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Script { .. } => 2,
            Self::List(ListError::MalformedValue { .. }) => 3,
            _ => 1,
        }
    }

    #[must_use]
    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: message.into(),
        }
    }
}
