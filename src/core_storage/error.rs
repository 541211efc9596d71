// Storage back-end errors and their FTP reply mapping
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to read pattern match: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }

    /// Reply used when a directory listing cannot be produced.
    pub fn to_ftp_response(&self) -> &'static str {
        if self.is_not_found() {
            "550 Folder not found.\r\n"
        } else {
            "451 Read error\r\n"
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
