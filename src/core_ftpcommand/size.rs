// core_ftpcommand/size.rs

use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info};

/// Handles the SIZE (File Size) FTP command (RFC 3659).
pub async fn handle_size_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let file_path = session.backend_path(arg);
    match server.storage.metadata(&file_path).await {
        Ok(metadata) if !metadata.is_dir => {
            info!("{}: size of {:?} is {}", session.peer, file_path, metadata.len);
            writer.send(213, &metadata.len.to_string()).await
        }
        Ok(_) => writer.send(450, "Failed to get size of file").await,
        Err(e) => {
            error!("{}: error getting size of {:?}: {}", session.peer, file_path, e);
            writer.send(450, "Failed to get size of file").await
        }
    }
}
