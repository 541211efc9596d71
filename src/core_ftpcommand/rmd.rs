use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::response::ReplyWriter;
use crate::core_storage::vpath::to_backend;
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, info, warn};

/// Handles the RMD (Remove Directory) FTP command.
///
/// The sandbox root itself can never be removed.
pub async fn handle_rmd_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let target = session.resolve(arg);
    if target == "/" {
        warn!("{}: refusing to remove the sandbox root", session.peer);
        return writer.send(550, "Delete operation failed").await;
    }

    let dir_path = to_backend(&session.sandbox_root, &target);
    match server.storage.remove_dir(&dir_path).await {
        Ok(()) => {
            info!("{}: directory removed: {:?}", session.peer, dir_path);
            writer
                .send(250, &format!("\"{}\" directory removed", target))
                .await
        }
        Err(e) => {
            error!("{}: error removing directory {:?}: {}", session.peer, dir_path, e);
            writer.send(550, "Delete operation failed").await
        }
    }
}
