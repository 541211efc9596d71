use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::response::ReplyWriter;
use crate::core_storage::vpath::to_backend;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};

/// Handles the RNTO (Rename To) FTP command.
///
/// Consumes the source staged by RNFR; without one the command fails.
pub async fn handle_rnto_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let Some(source) = session.rename_from.take() else {
        warn!("{}: RNTO without a preceding RNFR", session.peer);
        return writer
            .send(550, "Rename failed, no source given (use RNFR first)")
            .await;
    };

    let from = to_backend(&session.sandbox_root, &source);
    let to = session.backend_path(arg);
    match server.storage.rename(&from, &to).await {
        Ok(()) => {
            info!("{}: renamed {:?} to {:?}", session.peer, from, to);
            writer.send(250, "File renamed successfully").await
        }
        Err(e) => {
            warn!("{}: error renaming {:?} to {:?}: {}", session.peer, from, to, e);
            writer.send(550, "Rename failed").await
        }
    }
}
