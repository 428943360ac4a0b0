use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Message was not passed.")]
    MissingMessage,

    #[error("Invalid commit message: {0}")]
    InvalidMessage(String),

    #[error("Invalid username '{0}': usernames cannot contain whitespace")]
    InvalidUsername(String),

    #[error("Invalid path '{0}': only files directly in the working directory can be tracked")]
    InvalidPath(String),

    #[error("No files are tracked. Use 'add' first.")]
    NoTrackedFiles,

    #[error("Can't find '{}'.", .0.display())]
    FileNotFound(PathBuf),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("File changed while it was being committed: {}", .0.display())]
    ConcurrentModification(PathBuf),

    #[error("Invalid commit id: {0}")]
    InvalidCommitId(String),

    #[error("Corrupt log at line {line}: {reason}")]
    CorruptLog { line: usize, reason: String },

    #[error("Store is locked by another process: {}", .0.display())]
    Locked(PathBuf),
}

impl Error {
    /// Errors caused by how the engine was invoked rather than by the store.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::MissingMessage
                | Error::InvalidMessage(_)
                | Error::InvalidUsername(_)
                | Error::InvalidPath(_)
        )
    }
}
