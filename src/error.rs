// Error taxonomy shared by every layer of the tracker

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("No task with ID {0} found.")]
    NotFound(i64),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("task file {} is unreadable or corrupt: {source}", path.display())]
    StorageCorrupt {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to save tasks to {}: {source}", path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot prepare task file location {}: {source}", path.display())]
    StorageLocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TodoError {
    pub fn invalid(message: impl Into<String>) -> Self {
        TodoError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
