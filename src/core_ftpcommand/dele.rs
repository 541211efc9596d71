use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info};

/// Handles the DELE (Delete File) FTP command.
pub async fn handle_dele_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let file_path = session.backend_path(arg);
    match server.storage.remove_file(&file_path).await {
        Ok(()) => {
            info!("{}: file deleted: {:?}", session.peer, file_path);
            writer.send(250, "File deleted").await
        }
        Err(e) if e.is_not_found() => {
            error!("{}: error deleting file {:?}: {}", session.peer, file_path, e);
            writer.send(550, "File not found").await
        }
        Err(e) => {
            error!("{}: error deleting file {:?}: {}", session.peer, file_path, e);
            writer.send(550, "Permission denied").await
        }
    }
}
