use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "hackatime-doctor")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "Checks that your development environment is ready for hackatime")]
pub struct Cli {
    /// Write the default config file and exit
    #[arg(long = "init")]
    pub init: bool,

    /// Print the effective config and exit
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Validate the config file and exit
    #[arg(short = 'c', long = "check")]
    pub check: bool,

    /// Use this config file instead of the default location
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit results as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Disable colored output (also honored via NO_COLOR)
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Exit with status 1 when any check fails
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,

    /// Override the network timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
