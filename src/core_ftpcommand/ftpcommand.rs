use crate::constants::UNSUPPORTED_COMMANDS;

#[allow(clippy::upper_case_acronyms)]
#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    CDUP,
    CWD,
    DELE,
    FEAT,
    LIST,
    MKD,
    NLST,
    PASS,
    PASV,
    PORT,
    PWD,
    QUIT,
    RETR,
    RMD,
    RNFR,
    RNTO,
    SIZE,
    STOR,
    SYST,
    TYPE,
    USER,
    XPWD,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "CDUP" => Some(FtpCommand::CDUP),
            "CWD" => Some(FtpCommand::CWD),
            "DELE" => Some(FtpCommand::DELE),
            "FEAT" => Some(FtpCommand::FEAT),
            "LIST" => Some(FtpCommand::LIST),
            "MKD" => Some(FtpCommand::MKD),
            "NLST" => Some(FtpCommand::NLST),
            "PASS" => Some(FtpCommand::PASS),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "PWD" => Some(FtpCommand::PWD),
            "QUIT" => Some(FtpCommand::QUIT),
            "RETR" => Some(FtpCommand::RETR),
            "RMD" => Some(FtpCommand::RMD),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "SIZE" => Some(FtpCommand::SIZE),
            "STOR" => Some(FtpCommand::STOR),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            "USER" => Some(FtpCommand::USER),
            "XPWD" => Some(FtpCommand::XPWD),
            _ => None,
        }
    }

    /// Whether the command is silently ignored until the user has logged in.
    pub fn requires_auth(self) -> bool {
        !matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::SYST
                | FtpCommand::FEAT
                | FtpCommand::QUIT
        )
    }
}

/// Verbs that are known FTP commands this server does not implement.
pub fn is_known_unsupported(cmd: &str) -> bool {
    UNSUPPORTED_COMMANDS.contains(&cmd)
}

/// Splits a control line into an uppercase verb and a trimmed argument.
pub fn parse_command_line(line: &str) -> (String, String) {
    let line = line.trim();
    match line.split_once(' ') {
        Some((verb, arg)) => (verb.trim().to_ascii_uppercase(), arg.trim().to_string()),
        None => (line.to_ascii_uppercase(), String::new()),
    }
}
