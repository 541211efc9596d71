use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info};

/// Handles the MKD (Make Directory) FTP command.
///
/// The directory is created with mode 0755 below the session sandbox. The
/// reply echoes the name as the client gave it.
pub async fn handle_mkd_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let dir_path = session.backend_path(arg);
    match server.storage.create_dir(&dir_path).await {
        Ok(()) => {
            info!("{}: directory created: {:?}", session.peer, dir_path);
            writer
                .send(257, &format!("\"{}\" directory created", arg))
                .await
        }
        Err(e) => {
            error!("{}: error making directory {:?}: {}", session.peer, dir_path, e);
            writer
                .send(550, &format!("\"{}\" directory NOT created", arg))
                .await
        }
    }
}
