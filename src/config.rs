use crate::constants::{
    DATA_TIMEOUT_SECS, DEFAULT_GREETING, DEFAULT_PASSWD_PATH, DOWNLOAD_BUFFER_SIZE,
    MAX_AUTH_FAILURES, UPLOAD_BUFFER_SIZE,
};
use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_address: Option<String>, // Public IPv4 advertised in 227 replies
    pub base_sandbox: String,
    pub passwd_file: String,
    pub greeting: String,
    pub max_auth_failures: u32,
    pub data_timeout_secs: u64,
    pub idle_timeout_secs: u64, // 0 disables the idle timeout
    pub upload_buffer_size: usize,
    pub download_buffer_size: usize,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: 21,
            pasv_address: None,
            base_sandbox: String::from("/var/ftp"),
            passwd_file: String::from(DEFAULT_PASSWD_PATH),
            greeting: String::from(DEFAULT_GREETING),
            max_auth_failures: MAX_AUTH_FAILURES,
            data_timeout_secs: DATA_TIMEOUT_SECS,
            idle_timeout_secs: 0,
            upload_buffer_size: UPLOAD_BUFFER_SIZE,
            download_buffer_size: DOWNLOAD_BUFFER_SIZE,
            log_level: None,
        }
    }
}

impl ServerConfig {
    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.idle_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::parse(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn parse(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}", config.server.listen_address);
    info!("  Listen Port: {}", config.server.listen_port);
    if let Some(pasv_address) = &config.server.pasv_address {
        info!("  PASV Address: {}", pasv_address);
    }
    info!("  Base Sandbox: {}", config.server.base_sandbox);
    info!("  Passwd File: {}", config.server.passwd_file);
    info!("  Max Auth Failures: {}", config.server.max_auth_failures);
    info!("  Data Timeout: {}s", config.server.data_timeout_secs);
    info!(
        "  Upload Buffer Size: {} KB",
        config.server.upload_buffer_size / 1024
    );
    info!(
        "  Download Buffer Size: {} KB",
        config.server.download_buffer_size / 1024
    );
}
