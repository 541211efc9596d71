use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Replies 501 and returns `false` when a required argument is missing.
pub async fn require_arg(writer: &mut ReplyWriter, arg: &str) -> Result<bool, std::io::Error> {
    if arg.is_empty() {
        writer
            .send(501, "Syntax error in parameters or arguments.")
            .await?;
        return Ok(false);
    }
    Ok(true)
}

/// Waits for the session's data connection, replying 425 if none comes.
pub async fn open_data_connection(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
) -> Result<Option<TcpStream>, std::io::Error> {
    debug!("{}: data channel is {}", session.peer, session.data.state_name());
    match session
        .data
        .await_ready(server.config.server.data_timeout())
        .await
    {
        Ok(stream) => Ok(Some(stream)),
        Err(e) => {
            warn!("{}: no data connection: {}", session.peer, e);
            writer.send_raw(e.to_ftp_response()).await?;
            Ok(None)
        }
    }
}

/// Ends a data connection after a successful transfer.
pub async fn close_data_connection(mut data: TcpStream, session: &Session) {
    if let Err(e) = data.shutdown().await {
        debug!("{}: data connection shutdown: {}", session.peer, e);
    }
}
