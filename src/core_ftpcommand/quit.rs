use crate::core_ftpcommand::handlers::Flow;
use crate::core_network::response::ReplyWriter;
use crate::session::Session;
use log::info;

/// Handles the QUIT FTP command.
///
/// Replies, drops any data listener or connection and tells the connection
/// loop to close the control connection.
pub async fn handle_quit_command(
    writer: &mut ReplyWriter,
    session: &mut Session,
) -> Result<Flow, std::io::Error> {
    info!("{}: received QUIT command, closing connection", session.peer);
    writer.send(221, "Goodbye").await?;
    session.data.teardown();
    Ok(Flow::Close)
}
