use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::response::ReplyWriter;
use crate::core_storage::vpath::to_backend;
use crate::server::ServerContext;
use crate::session::Session;
use log::debug;

/// Handles the RNFR (Rename From) FTP command.
///
/// Both outcomes reply 350; only an existing source is staged for RNTO.
pub async fn handle_rnfr_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let source = session.resolve(arg);
    debug!("{}: rename from {}", session.peer, source);

    if server
        .storage
        .exists(&to_backend(&session.sandbox_root, &source))
        .await
    {
        session.rename_from = Some(source);
        writer
            .send(350, "File exists, ready for destination name")
            .await
    } else {
        session.rename_from = None;
        writer
            .send(350, "Command failed, file does not exist")
            .await
    }
}
