// src/constants.rs

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9._-]{1,32}$";

/// Rejected PASS attempts after which the control connection is closed.
pub const MAX_AUTH_FAILURES: u32 = 2;

pub const SYSTEM_TYPE: &str = "UNIX Type: L8";
pub const DEFAULT_GREETING: &str = "FTP server (ftpsandboxd) ready";

pub const DEFAULT_CONFIG_PATH: &str = "/etc/ftpsandboxd.conf";
pub const DEFAULT_PASSWD_PATH: &str = "/etc/ftpsandboxd.passwd";

pub const UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;
pub const DATA_TIMEOUT_SECS: u64 = 30;
pub const MAX_COMMAND_LINE: usize = 4096; // Longer control lines get 500

/// Verbs recognised as FTP but deliberately not implemented.
pub const UNSUPPORTED_COMMANDS: &[&str] = &[
    "ABOR", "ACCT", "ADAT", "ALLO", "APPE", "AUTH", "CCC", "CONF", "ENC", "EPRT", "EPSV", "HELP",
    "LANG", "LPRT", "LPSV", "MDTM", "MIC", "MLSD", "MLST", "MODE", "NOOP", "OPTS", "PBSZ", "REIN",
    "REST", "SITE", "SMNT", "STAT", "STOU", "STRU",
];
