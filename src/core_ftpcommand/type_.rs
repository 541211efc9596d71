use crate::core_network::response::ReplyWriter;
use crate::session::{Session, TransferType};
use log::debug;

/// Handles the TYPE FTP command.
///
/// `A` selects ASCII, anything else BINARY. Neither alters the bytes sent.
pub async fn handle_type_command(
    writer: &mut ReplyWriter,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    let primary_type = arg
        .split_whitespace()
        .next()
        .map(|s| s.to_ascii_uppercase())
        .unwrap_or_default();

    let response = if primary_type == "A" {
        session.transfer_type = TransferType::Ascii;
        "Type set to A"
    } else {
        session.transfer_type = TransferType::Binary;
        "Type set to I"
    };
    debug!("{}: transfer type is now {}", session.peer, session.transfer_type);
    writer.send(200, response).await
}
