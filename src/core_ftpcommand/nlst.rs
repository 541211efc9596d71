use crate::core_ftpcommand::utils::{close_data_connection, open_data_connection};
use crate::core_network::response::ReplyWriter;
use crate::core_storage::vpath::{collapse_pattern, resolve, to_backend};
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Builds the glob pattern for an NLST argument.
///
/// `..` and repeated `/` are stripped from the argument first. Everything
/// that names an existing location (the sandbox root, the working directory,
/// or the whole target when it is a directory) is escaped, so only the
/// client's own pattern segment is treated as a pattern.
pub fn nlst_pattern(sandbox_root: &Path, cwd: &str, arg: &str, is_dir: bool) -> PathBuf {
    let collapsed = collapse_pattern(arg);
    if is_dir {
        let target = to_backend(sandbox_root, &resolve(cwd, &collapsed));
        let mut pattern = PathBuf::from(glob::Pattern::escape(&target.to_string_lossy()));
        pattern.push("*");
        return pattern;
    }

    let base = if collapsed.starts_with('/') { "/" } else { cwd };
    let literal = to_backend(sandbox_root, base);
    let mut pattern = PathBuf::from(glob::Pattern::escape(&literal.to_string_lossy()));
    let segment = resolve("/", &collapsed);
    let segment = segment.trim_start_matches('/');
    if !segment.is_empty() {
        pattern.push(segment);
    }
    pattern
}

/// Handles the NLST FTP command.
///
/// Sends the base names of the entries matching the argument (the working
/// directory's children when there is none), one per line.
pub async fn handle_nlst_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    let Some(mut data) = open_data_connection(writer, server, session).await? else {
        return Ok(());
    };

    let literal = to_backend(
        &session.sandbox_root,
        &session.resolve(&collapse_pattern(arg)),
    );
    let is_dir = matches!(server.storage.metadata(&literal).await, Ok(m) if m.is_dir);
    let pattern = nlst_pattern(&session.sandbox_root, session.cwd(), arg, is_dir);

    let files = match server.storage.glob(&pattern).await {
        Ok(files) => files,
        Err(e) => {
            warn!("{}: during NLST, error globbing {:?}: {}", session.peer, pattern, e);
            return writer.send(451, "Read error").await;
        }
    };

    writer.send(150, "Here comes the directory listing").await?;
    debug!("{}: NLST matched {} entries", session.peer, files.len());

    let mut listing = String::new();
    for file in files
        .iter()
        .filter(|file| file.starts_with(&session.sandbox_root))
    {
        if let Some(name) = file.file_name() {
            listing.push_str(&name.to_string_lossy());
            listing.push_str("\r\n");
        }
    }
    if let Err(e) = data.write_all(listing.as_bytes()).await {
        error!("{}: failed to send name list: {}", session.peer, e);
        return writer
            .send(426, "Connection closed; transfer aborted.")
            .await;
    }

    close_data_connection(data, session).await;
    writer.send(226, "Transfer OK").await
}
