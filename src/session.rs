use crate::core_network::datachan::DataChannel;
use crate::core_storage::vpath::{self, WorkingDir};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    #[default]
    Ascii,
    Binary,
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferType::Ascii => write!(f, "ASCII"),
            TransferType::Binary => write!(f, "BINARY"),
        }
    }
}

/// State of one control connection. Owned by the task serving it and never
/// shared with other connections.
#[derive(Debug)]
pub struct Session {
    pub peer: SocketAddr,
    pub local_addr: SocketAddr,
    pub pending_user: Option<String>, // Accepted by USER, awaiting PASS
    pub username: Option<String>,     // Set by a successful PASS
    pub failed_attempts: u32,
    pub working_dir: WorkingDir,
    pub sandbox_root: PathBuf,
    pub transfer_type: TransferType,
    pub rename_from: Option<String>,
    pub data: DataChannel,
}

impl Session {
    pub fn new(peer: SocketAddr, local_addr: SocketAddr, base_sandbox: PathBuf) -> Self {
        Self {
            peer,
            local_addr,
            pending_user: None,
            username: None,
            failed_attempts: 0,
            working_dir: WorkingDir::default(),
            sandbox_root: base_sandbox,
            transfer_type: TransferType::default(),
            rename_from: None,
            data: DataChannel::new(peer.to_string()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    /// Marks `username` as logged in and confines it to its own sandbox.
    pub fn log_in(&mut self, username: String, base_sandbox: &Path) {
        self.sandbox_root = base_sandbox.join(&username);
        self.username = Some(username);
        self.pending_user = None;
    }

    pub fn cwd(&self) -> &str {
        self.working_dir.cwd()
    }

    /// Virtual path of `arg` relative to the working directory.
    pub fn resolve(&self, arg: &str) -> String {
        self.working_dir.resolve(arg)
    }

    /// Backend path of `arg`, always below the sandbox root.
    pub fn backend_path(&self, arg: &str) -> PathBuf {
        vpath::to_backend(&self.sandbox_root, &self.resolve(arg))
    }
}
