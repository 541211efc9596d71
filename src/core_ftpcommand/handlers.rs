use crate::core_ftpcommand::ftpcommand::{is_known_unsupported, parse_command_line, FtpCommand};
use crate::core_ftpcommand::{
    cdup, cwd, dele, feat, list, mkd, nlst, pass, pwd, quit, retr, rmd, rnfr, rnto, size, stor,
    syst, type_, user,
};
use crate::core_network::response::ReplyWriter;
use crate::core_network::{pasv, port};
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, info};

/// What the connection loop does after a command has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Parses one control line and runs the matching handler.
///
/// Unknown and unimplemented verbs get `202`. Verbs that need a login are
/// ignored without a reply until the user has authenticated. An `Err` means
/// the control connection itself failed.
pub async fn dispatch(
    writer: &mut ReplyWriter,
    server: &ServerContext,
    session: &mut Session,
    line: &str,
) -> Result<Flow, std::io::Error> {
    let (verb, arg) = parse_command_line(line);
    if verb.is_empty() {
        return Ok(Flow::Continue);
    }

    if verb == "PASS" {
        debug!("{}: FTP command: PASS ****", session.peer);
    } else {
        debug!("{}: FTP command: {} {}", session.peer, verb, arg);
    }

    let Some(command) = FtpCommand::from_str(&verb) else {
        if is_known_unsupported(&verb) {
            info!("{}: {} is an unsupported command", session.peer, verb);
        } else {
            info!("{}: {} is an unknown command", session.peer, verb);
        }
        writer.send(202, "Not supported").await?;
        return Ok(Flow::Continue);
    };

    if command.requires_auth() && !session.is_authenticated() {
        debug!("{}: ignoring {} before login", session.peer, verb);
        return Ok(Flow::Continue);
    }

    match command {
        FtpCommand::USER => user::handle_user_command(writer, server, session, &arg).await?,
        FtpCommand::PASS => return pass::handle_pass_command(writer, server, session, &arg).await,
        FtpCommand::QUIT => return quit::handle_quit_command(writer, session).await,
        FtpCommand::SYST => syst::handle_syst_command(writer).await?,
        FtpCommand::FEAT => feat::handle_feat_command(writer).await?,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, server, session, &arg).await?,
        FtpCommand::CDUP => cdup::handle_cdup_command(writer, session).await?,
        FtpCommand::PWD | FtpCommand::XPWD => pwd::handle_pwd_command(writer, session).await?,
        FtpCommand::MKD => mkd::handle_mkd_command(writer, server, session, &arg).await?,
        FtpCommand::RMD => rmd::handle_rmd_command(writer, server, session, &arg).await?,
        FtpCommand::DELE => dele::handle_dele_command(writer, server, session, &arg).await?,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(writer, server, session, &arg).await?,
        FtpCommand::RNTO => rnto::handle_rnto_command(writer, server, session, &arg).await?,
        FtpCommand::SIZE => size::handle_size_command(writer, server, session, &arg).await?,
        FtpCommand::TYPE => type_::handle_type_command(writer, session, &arg).await?,
        FtpCommand::PASV => pasv::handle_pasv_command(writer, server, session).await?,
        FtpCommand::PORT => port::handle_port_command(writer, session, &arg).await?,
        FtpCommand::LIST => list::handle_list_command(writer, server, session, &arg).await?,
        FtpCommand::NLST => nlst::handle_nlst_command(writer, server, session, &arg).await?,
        FtpCommand::RETR => retr::handle_retr_command(writer, server, session, &arg).await?,
        FtpCommand::STOR => stor::handle_stor_command(writer, server, session, &arg).await?,
    }

    Ok(Flow::Continue)
}
