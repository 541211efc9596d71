use crate::core_auth::AuthError;
use crate::core_ftpcommand::handlers::Flow;
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};

/// Handles the PASS FTP command.
///
/// On success the session is logged in and confined to
/// `<base sandbox>/<username>`, created if missing. Each rejection counts as
/// a failed attempt; reaching `max_auth_failures` closes the connection.
pub async fn handle_pass_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    password: &str,
) -> Result<Flow, std::io::Error> {
    let outcome = match session.pending_user.clone() {
        Some(username) => server
            .validator
            .check_password(&username, password)
            .await
            .map(|()| username),
        None => Err(AuthError::NoUsername),
    };

    match outcome {
        Ok(username) => {
            let home = server.base_sandbox.join(&username);
            if let Err(e) = server.storage.create_dir_all(&home).await {
                warn!("{}: could not create sandbox {:?}: {}", session.peer, home, e);
            }
            info!("{}: user {} logged on", session.peer, username);
            session.log_in(username, &server.base_sandbox);
            writer.send(230, "Logged on").await?;
            Ok(Flow::Continue)
        }
        Err(e) => {
            session.failed_attempts += 1;
            session.username = None;
            warn!(
                "{}: PASS rejected ({} failure(s)): {}",
                session.peer, session.failed_attempts, e
            );
            writer.send_raw(&e.to_ftp_response()).await?;

            if session.failed_attempts >= server.config.server.max_auth_failures {
                warn!("{}: too many authentication failures, disconnecting", session.peer);
                return Ok(Flow::Close);
            }
            Ok(Flow::Continue)
        }
    }
}
