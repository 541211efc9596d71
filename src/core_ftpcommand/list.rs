use crate::core_ftpcommand::utils::{close_data_connection, open_data_connection};
use crate::core_network::response::ReplyWriter;
use crate::core_storage::vpath::to_backend;
use crate::core_storage::{DirEntry, Metadata};
use crate::server::ServerContext;
use crate::session::Session;
use chrono::{DateTime, Local};
use log::{debug, error, warn};
use std::time::SystemTime;
use tokio::io::AsyncWriteExt;

const PERMISSION_BITS: [(u32, char); 9] = [
    (0o400, 'r'),
    (0o200, 'w'),
    (0o100, 'x'),
    (0o040, 'r'),
    (0o020, 'w'),
    (0o010, 'x'),
    (0o004, 'r'),
    (0o002, 'w'),
    (0o001, 'x'),
];

/// `drwxr-xr-x` style type and permission column.
pub fn format_permissions(metadata: &Metadata) -> String {
    let mut out = String::with_capacity(10);
    out.push(if metadata.is_dir { 'd' } else { '-' });
    for (bit, flag) in PERMISSION_BITS {
        out.push(if metadata.mode & bit != 0 { flag } else { '-' });
    }
    out
}

pub fn format_mtime(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format("%b %d %H:%M")
        .to_string()
}

/// One `ls -l` style line, without the line terminator.
pub fn format_list_line(entry: &DirEntry) -> String {
    format!(
        "{} 1 ftp ftp {:>12} {:>12} {}",
        format_permissions(&entry.metadata),
        entry.metadata.len,
        format_mtime(entry.metadata.modified),
        entry.name
    )
}

/// Target of a LIST argument, skipping `ls` style option words.
fn list_target(arg: &str) -> &str {
    arg.split_whitespace()
        .find(|word| !word.starts_with('-'))
        .unwrap_or("")
}

/// Handles the LIST FTP command.
///
/// Lists the working directory, or the path given as argument, over the
/// data connection. A file argument lists that single entry.
pub async fn handle_list_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    let target = session.resolve(list_target(arg));
    let dir_path = to_backend(&session.sandbox_root, &target);

    let Some(mut data) = open_data_connection(writer, server, session).await? else {
        return Ok(());
    };

    let listing = match server.storage.metadata(&dir_path).await {
        Ok(metadata) if !metadata.is_dir => Ok(vec![DirEntry {
            name: target.rsplit('/').next().unwrap_or_default().to_string(),
            metadata,
        }]),
        Ok(_) => server.storage.list(&dir_path).await,
        Err(e) => Err(e),
    };
    let entries = match listing {
        Ok(entries) => entries,
        Err(e) => {
            warn!("{}: while sending file list, reading {:?}: {}", session.peer, dir_path, e);
            return writer.send_raw(e.to_ftp_response()).await;
        }
    };

    writer.send(150, "Here comes the directory listing").await?;
    debug!("{}: directory has {} entries", session.peer, entries.len());

    let mut listing = String::new();
    for entry in &entries {
        listing.push_str(&format_list_line(entry));
        listing.push_str("\r\n");
    }
    if let Err(e) = data.write_all(listing.as_bytes()).await {
        error!("{}: failed to send directory listing: {}", session.peer, e);
        return writer
            .send(426, "Connection closed; transfer aborted.")
            .await;
    }

    close_data_connection(data, session).await;
    writer.send(226, "Transfer OK").await
}
