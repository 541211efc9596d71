use crate::core_ftpcommand::utils::{close_data_connection, open_data_connection, require_arg};
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Handles the RETR (Retrieve) FTP command.
///
/// Streams the file to the data connection after the 150 reply has been
/// flushed, then closes the data connection and replies 226. Bytes are sent
/// unchanged whatever the transfer type.
///
/// # Arguments
///
/// * `writer` - The control connection reply writer.
/// * `server` - The shared server context (storage, buffer sizes).
/// * `session` - The session owning the data channel.
/// * `arg` - The name of the file to retrieve.
pub async fn handle_retr_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    if !require_arg(writer, arg).await? {
        return Ok(());
    }

    let file_path = session.backend_path(arg);
    let Some(mut data) = open_data_connection(writer, server, session).await? else {
        return Ok(());
    };

    let mut file = match server.storage.open_read(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("{}: error reading file {:?}: {}", session.peer, file_path, e);
            writer.send(550, "File not found or not readable").await?;
            return Ok(());
        }
    };
    debug!("{}: DATA file {:?} opened", session.peer, file_path);

    writer
        .send(
            150,
            &format!("Opening {} mode data connection", session.transfer_type),
        )
        .await?;

    let mut buffer = vec![0; server.config.server.download_buffer_size.max(1)];
    let mut sent: u64 = 0;
    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("{}: error reading file {:?}: {}", session.peer, file_path, e);
                return writer.send(451, "Error reading file").await;
            }
        };
        if let Err(e) = data.write_all(&buffer[..bytes_read]).await {
            error!("{}: error sending file to client: {}", session.peer, e);
            return writer
                .send(426, "Connection closed; transfer aborted.")
                .await;
        }
        sent += bytes_read as u64;
    }

    close_data_connection(data, session).await;
    info!("{}: sent {:?} ({} bytes)", session.peer, file_path, sent);
    writer.send(226, "Closing data connection").await
}
