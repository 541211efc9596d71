use crate::core_network::response::ReplyWriter;
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};

/// Encodes an endpoint as `h1,h2,h3,h4,p1,p2`.
pub fn encode_host_port(addr: SocketAddrV4) -> String {
    let [h1, h2, h3, h4] = addr.ip().octets();
    format!(
        "{},{},{},{},{},{}",
        h1,
        h2,
        h3,
        h4,
        addr.port() / 256,
        addr.port() % 256
    )
}

fn ipv4_of(ip: IpAddr) -> Option<Ipv4Addr> {
    match ip {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}

/// Handles the PASV FTP command.
///
/// The listener is bound on the control connection's local address, so the
/// advertised endpoint is the one actually bound unless `pasv_address`
/// overrides the host part. Command intake stays suspended until this
/// returns because the connection loop awaits each handler in turn.
pub async fn handle_pasv_command(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
) -> Result<(), std::io::Error> {
    let Some(bind_ip) = ipv4_of(session.local_addr.ip()) else {
        warn!("{}: PASV on a non-IPv4 control connection", session.peer);
        session.data.teardown();
        return writer.send(425, "Passive mode requires IPv4.").await;
    };

    let bound = match session.data.enter_passive(bind_ip).await {
        Ok(addr) => addr,
        Err(e) => {
            error!("{}: failed to bind passive listener: {}", session.peer, e);
            return writer.send(425, "Can't open passive connection.").await;
        }
    };

    let advertised = match server.config.server.pasv_address.as_deref() {
        Some(public) => match public.parse::<Ipv4Addr>() {
            Ok(ip) => SocketAddrV4::new(ip, bound.port()),
            Err(e) => {
                warn!("Ignoring invalid pasv_address {:?}: {}", public, e);
                bound
            }
        },
        None => bound,
    };

    debug!("{}: PASV listening on {}, advertising {}", session.peer, bound, advertised);
    writer
        .send(
            227,
            &format!("Entering Passive Mode ({})", encode_host_port(advertised)),
        )
        .await
}
