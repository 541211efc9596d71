use crate::core_network::response::ReplyWriter;
use crate::session::Session;
use log::{info, warn};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Parses a PORT argument of the form `h1,h2,h3,h4,p1,p2`.
pub fn parse_host_port(arg: &str) -> Option<SocketAddrV4> {
    let parts: Vec<u8> = arg
        .split(',')
        .map(|x| x.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 6 {
        return None;
    }
    let ip = Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]);
    let port = (parts[4] as u16) << 8 | parts[5] as u16;
    Some(SocketAddrV4::new(ip, port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the endpoint; the connection is opened when a transfer
/// needs it.
pub async fn handle_port_command(
    writer: &mut ReplyWriter,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error> {
    let Some(addr) = parse_host_port(arg) else {
        warn!("{}: malformed PORT argument: {:?}", session.peer, arg);
        return writer
            .send(501, "Syntax error in parameters or arguments.")
            .await;
    };

    info!("{}: PORT target set to {}", session.peer, addr);
    session.data.enter_active(addr);
    writer.send(200, "PORT command successful.").await
}
