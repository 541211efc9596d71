// Here's the list of the FTP commands implemented
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod handlers;
pub mod list;
pub mod mkd;
pub mod nlst;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// The command parser and common helpers are here
pub mod ftpcommand;
pub mod utils;
