use crate::core_network::response::ReplyWriter;
use crate::session::Session;
use log::info;

/// Handles the CDUP FTP command. The root is its own parent.
pub async fn handle_cdup_command(
    writer: &mut ReplyWriter,
    session: &mut Session,
) -> Result<(), std::io::Error> {
    let new_dir = session.working_dir.chdir("..").to_string();
    info!("{}: directory changed to {}", session.peer, new_dir);
    writer
        .send(250, &format!("Directory changed to {}", new_dir))
        .await
}
