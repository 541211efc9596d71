use crate::config::{log_config, Config};
use crate::core_auth::{CredentialValidator, PasswdValidator};
use crate::core_network::network;
use crate::core_storage::{LocalFilesystem, StorageBackend};
use anyhow::Result;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Process-wide state, read-only once the server is running.
#[derive(Debug)]
pub struct ServerContext {
    pub config: Config,
    pub base_sandbox: PathBuf,
    pub storage: Arc<dyn StorageBackend>,
    pub validator: Arc<dyn CredentialValidator>,
}

impl ServerContext {
    pub fn new(
        config: Config,
        storage: Arc<dyn StorageBackend>,
        validator: Arc<dyn CredentialValidator>,
    ) -> Self {
        let base_sandbox = PathBuf::from(&config.server.base_sandbox);
        Self {
            config,
            base_sandbox,
            storage,
            validator,
        }
    }
}

/// Runs the FTP server with the provided configuration.
///
/// Loads the passwd file, binds the control listener and serves connections
/// until the listener fails.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config:");
    log_config(&config);

    let validator = PasswdValidator::load(&config.server.passwd_file).await?;
    let context = Arc::new(ServerContext::new(
        config,
        Arc::new(LocalFilesystem::new()),
        Arc::new(validator),
    ));

    let listener = network::bind(&context.config).await?;
    match network::serve(listener, context).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Server failed: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
