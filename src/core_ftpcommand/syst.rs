use crate::constants::SYSTEM_TYPE;
use crate::core_network::response::ReplyWriter;
use log::debug;

/// Handles the SYST (System) FTP command.
pub async fn handle_syst_command(writer: &mut ReplyWriter) -> Result<(), std::io::Error> {
    debug!("Responding to SYST command with system type.");
    writer.send(215, SYSTEM_TYPE).await
}
