// src/core_ftpcommand/pwd.rs
use crate::core_network::response::ReplyWriter;
use crate::session::Session;

/// Handles PWD and XPWD.
pub async fn handle_pwd_command(
    writer: &mut ReplyWriter,
    session: &Session,
) -> Result<(), std::io::Error> {
    let response = format!("\"{}\" is current directory", session.cwd());
    writer.send(257, &response).await
}
