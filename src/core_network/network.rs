use crate::config::Config;
use crate::constants::MAX_COMMAND_LINE;
use crate::core_ftpcommand::handlers::{dispatch, Flow};
use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    Line,
    TooLong,
    Eof,
}

/// Reads one control line into `buffer`, holding at most `limit` bytes.
///
/// The remainder of an overlong line is read and discarded in `limit`
/// sized chunks.
async fn read_command_line<R>(reader: &mut R, buffer: &mut Vec<u8>, limit: usize) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buffer.clear();
    let read = (&mut *reader)
        .take(limit as u64)
        .read_until(b'\n', buffer)
        .await?;
    if read == 0 {
        return Ok(LineRead::Eof);
    }
    if buffer.last() == Some(&b'\n') || read < limit {
        return Ok(LineRead::Line);
    }

    let mut discard = Vec::new();
    loop {
        discard.clear();
        let n = (&mut *reader)
            .take(limit as u64)
            .read_until(b'\n', &mut discard)
            .await?;
        if n == 0 || discard.last() == Some(&b'\n') {
            return Ok(LineRead::TooLong);
        }
    }
}

pub async fn bind(config: &Config) -> Result<TcpListener> {
    let addr = format!(
        "{}:{}",
        config.server.listen_address, config.server.listen_port
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind control listener on {}", addr))?;
    info!("Server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accepts control connections forever, one task and one session each.
pub async fn serve(listener: TcpListener, context: Arc<ServerContext>) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept control connection: {}", e);
                continue;
            }
        };
        info!("New connection from {}", addr);

        let context = Arc::clone(&context);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, context).await {
                warn!("{}: connection error: {}", addr, e);
            }
            info!("{}: connection closed", addr);
        });
    }
}

pub async fn handle_connection(socket: TcpStream, context: Arc<ServerContext>) -> Result<()> {
    socket.set_nodelay(true)?;
    let peer = socket.peer_addr()?;
    let local = socket.local_addr()?;
    let (read_half, write_half) = socket.into_split();

    let mut writer = ReplyWriter::new(Box::new(write_half), peer.to_string());
    let mut session = Session::new(peer, local, context.base_sandbox.clone());
    debug!("{}: base FTP directory: {:?}", peer, session.sandbox_root);

    writer.send(220, &context.config.server.greeting).await?;

    let idle_timeout = context.config.server.idle_timeout();
    let mut reader = BufReader::new(read_half);
    let mut buffer = Vec::new();

    loop {
        let read = match idle_timeout {
            Some(limit) => {
                match timeout(limit, read_command_line(&mut reader, &mut buffer, MAX_COMMAND_LINE)).await {
                    Ok(read) => read?,
                    Err(_) => {
                        info!("{}: idle timeout", peer);
                        writer
                            .send(421, "Idle timeout, closing control connection.")
                            .await?;
                        break;
                    }
                }
            }
            None => read_command_line(&mut reader, &mut buffer, MAX_COMMAND_LINE).await?,
        };

        match read {
            LineRead::Line => {}
            LineRead::Eof => {
                info!("{}: client connection ended", peer);
                break;
            }
            LineRead::TooLong => {
                warn!("{}: command line longer than {} bytes dropped", peer, MAX_COMMAND_LINE);
                writer.send(500, "Command line too long.").await?;
                continue;
            }
        }

        let line = String::from_utf8_lossy(&buffer);
        match dispatch(&mut writer, &context, &mut session, &line).await? {
            Flow::Continue => {}
            Flow::Close => break,
        }
    }

    // Dropping the session would do this too; keep the order explicit.
    session.data.teardown();
    if let Err(e) = writer.shutdown().await {
        debug!("{}: control shutdown: {}", peer, e);
    }
    Ok(())
}
