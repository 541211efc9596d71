//! Storage back-end used by every file verb.
//!
//! Paths handed to a [`StorageBackend`] are absolute and already confined to
//! the session's sandbox root; see [`vpath`] for how they are built.

pub mod error;
pub mod local;
pub mod vpath;

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::io::{AsyncRead, AsyncWrite};

pub use error::{Result, StorageError};
pub use local::LocalFilesystem;

pub type ReadStream = Box<dyn AsyncRead + Send + Unpin>;
pub type WriteStream = Box<dyn AsyncWrite + Send + Unpin>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub is_dir: bool,
    pub mode: u32, // Unix permission bits
    pub len: u64,
    pub modified: SystemTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub metadata: Metadata,
}

#[async_trait]
pub trait StorageBackend: Send + Sync + Debug {
    async fn exists(&self, path: &Path) -> bool;

    async fn metadata(&self, path: &Path) -> Result<Metadata>;

    /// Lists the entries of a directory, sorted by name.
    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>>;

    async fn create_dir(&self, path: &Path) -> Result<()>;

    async fn create_dir_all(&self, path: &Path) -> Result<()>;

    async fn remove_dir(&self, path: &Path) -> Result<()>;

    async fn remove_file(&self, path: &Path) -> Result<()>;

    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    async fn open_read(&self, path: &Path) -> Result<ReadStream>;

    /// Opens `path` for writing, creating or truncating it.
    async fn open_write(&self, path: &Path) -> Result<WriteStream>;

    /// Expands a glob pattern into the absolute paths it matches, sorted.
    async fn glob(&self, pattern: &Path) -> Result<Vec<PathBuf>>;
}
