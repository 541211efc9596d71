use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};

/// Handles the USER FTP command.
///
/// Asks the credential validator about the username. An accepted name is
/// remembered until the next PASS.
///
/// # Arguments
///
/// * `writer` - The control connection reply writer.
/// * `server` - The shared server context holding the validator.
/// * `session` - The session of this control connection.
/// * `username` - The username provided by the client.
pub async fn handle_user_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    username: &str,
) -> Result<(), std::io::Error> {
    info!("{}: received USER command with username: {}", session.peer, username);

    match server.validator.check_user(username).await {
        Ok(()) => {
            session.pending_user = Some(username.to_string());
            writer
                .send(331, &format!("Password required for {}", username))
                .await
        }
        Err(e) => {
            warn!("{}: USER rejected: {}", session.peer, e);
            session.pending_user = None;
            writer.send_raw(&e.to_ftp_response()).await
        }
    }
}
