use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ftpsandboxd", about = "A sandboxed FTP server written in Rust.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Control connection port, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Base sandbox directory, overrides the configuration file
    #[arg(short, long)]
    pub sandbox: Option<String>,

    /// Print a bcrypt hash for a passwd file entry and exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter derived from the verbosity flag and the configured level.
    pub fn log_filter(&self, configured: Option<&str>) -> String {
        match self.verbose {
            0 => configured.unwrap_or("info").to_string(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}
