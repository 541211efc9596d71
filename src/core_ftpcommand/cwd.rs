use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};

/// Handles the CWD FTP command.
///
/// The target must be an existing directory inside the sandbox.
pub async fn handle_cwd_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    let dir_path = session.backend_path(arg);

    match server.storage.metadata(&dir_path).await {
        Ok(metadata) if metadata.is_dir => {
            let new_dir = session.working_dir.chdir(arg).to_string();
            info!("{}: directory changed to {}", session.peer, new_dir);
            writer
                .send(
                    250,
                    &format!("CWD successful. \"{}\" is current directory", new_dir),
                )
                .await
        }
        Ok(_) => {
            warn!("{}: CWD target is not a directory: {:?}", session.peer, dir_path);
            writer.send(550, "Folder not found.").await
        }
        Err(e) => {
            warn!("{}: CWD failed for {:?}: {}", session.peer, dir_path, e);
            writer.send(550, "Folder not found.").await
        }
    }
}
