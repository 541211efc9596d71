mod config;
mod constants;
mod core_auth;
mod core_cli;
mod core_ftpcommand;
mod core_network;
mod core_storage;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use env_logger::{Builder, Env};
use log::warn;
use std::io::Write;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    if let Some(password) = &args.hash_password {
        let hashed = core_auth::helper::hash_password(password)
            .context("Failed to hash password")?;
        println!("{}", hashed);
        return Ok(());
    }

    // An explicit config path must load; the default one may be absent.
    let (mut config, using_defaults) = if !args.config.is_empty() {
        (Config::load_from_file(&args.config)?, false)
    } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
        (Config::load_from_file(DEFAULT_CONFIG_PATH)?, false)
    } else {
        (Config::default(), true)
    };

    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(sandbox) = &args.sandbox {
        config.server.base_sandbox = sandbox.clone();
    }

    // Initialize the logger with a custom format and colors
    let filter = args.log_filter(config.server.log_level.as_deref());
    Builder::from_env(Env::default().default_filter_or(filter))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();

    if using_defaults {
        warn!(
            "No configuration file at {}, using built-in defaults",
            DEFAULT_CONFIG_PATH
        );
    }

    // Run the FTP server
    server::run(config).await?;

    Ok(())
}
