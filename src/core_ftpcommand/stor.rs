use crate::core_ftpcommand::utils::{open_data_connection, require_arg};
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, info};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Handles the STOR (Store File) FTP command.
///
/// The file is created or truncated before 150 is sent; if that fails the
/// reply is 553 and the data connection is closed unread. The transfer ends
/// when the client closes the data connection.
pub async fn handle_stor_command(
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

    let mut file = match server.storage.open_write(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            error!("{}: error opening/creating file {:?}: {}", session.peer, file_path, e);
            drop(data);
            return writer.send(553, "Could not create file").await;
        }
    };
    debug!("{}: file opened/created: {:?}", session.peer, file_path);

    writer.send(150, "Ok to send data").await?;

    let mut buffer = vec![0; server.config.server.upload_buffer_size.max(1)];
    let mut received: u64 = 0;
    loop {
        let bytes_read = match data.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("{}: error transferring {:?}: {}", session.peer, file_path, e);
                return writer
                    .send(426, "Connection closed; transfer aborted.")
                    .await;
            }
        };
        if let Err(e) = file.write_all(&buffer[..bytes_read]).await {
            error!("{}: error writing to file {:?}: {}", session.peer, file_path, e);
            return writer.send(451, "Error writing file").await;
        }
        received += bytes_read as u64;
    }

    if let Err(e) = file.shutdown().await {
        error!("{}: error closing file {:?}: {}", session.peer, file_path, e);
        return writer.send(451, "Error writing file").await;
    }

    info!("{}: stored {:?} ({} bytes)", session.peer, file_path, received);
    writer.send(226, "Transfer complete").await
}
