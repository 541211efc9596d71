use crate::core_network::response::ReplyWriter;
use log::debug;

/// Handles the FEAT (Feature) FTP command.
///
/// SIZE is the only extension implemented.
pub async fn handle_feat_command(writer: &mut ReplyWriter) -> Result<(), std::io::Error> {
    let features = ["SIZE"];

    debug!("Responding to FEAT command with supported features.");
    writer
        .send_multiline(211, "Features", &features, "end")
        .await
}
