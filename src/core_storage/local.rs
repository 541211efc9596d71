use super::{DirEntry, Metadata, ReadStream, Result, StorageBackend, StorageError, WriteStream};
use async_trait::async_trait;
use log::trace;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// Storage back-end on the local filesystem, driven by `tokio::fs`.
#[derive(Debug, Clone, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_of(metadata: &std::fs::Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

fn convert(metadata: &std::fs::Metadata) -> Metadata {
    Metadata {
        is_dir: metadata.is_dir(),
        mode: mode_of(metadata),
        len: metadata.len(),
        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
    }
}

#[async_trait]
impl StorageBackend for LocalFilesystem {
    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn metadata(&self, path: &Path) -> Result<Metadata> {
        let metadata = fs::metadata(path).await?;
        Ok(convert(&metadata))
    }

    async fn list(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            // Follow symlinks like `stat` would; skip dangling ones.
            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    trace!("Skipping unreadable entry {:?}: {}", entry.path(), e);
                    continue;
                }
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                metadata: convert(&metadata),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn create_dir(&self, path: &Path) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        builder.mode(0o755);
        builder.create(path).await?;
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await?;
        Ok(())
    }

    async fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await?;
        Ok(())
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).await?;
        Ok(())
    }

    async fn open_read(&self, path: &Path) -> Result<ReadStream> {
        let file = fs::File::open(path).await?;
        Ok(Box::new(file))
    }

    async fn open_write(&self, path: &Path) -> Result<WriteStream> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o644);
        let file = options.open(path).await?;
        Ok(Box::new(file))
    }

    async fn glob(&self, pattern: &Path) -> Result<Vec<PathBuf>> {
        let pattern = pattern.to_string_lossy().into_owned();
        // The glob crate walks the filesystem synchronously.
        tokio::task::spawn_blocking(move || {
            let mut matches = glob::glob(&pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
            matches.sort();
            Ok::<_, StorageError>(matches)
        })
        .await?
    }
}
