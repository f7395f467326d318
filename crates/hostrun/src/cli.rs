//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use hostrun_core::RunConfig;
use hostrun_exec::DEFAULT_SSH_PORT;

use crate::config::DEFAULT_HOSTS_FILE;

/// Run elevated commands over SSH on a list of hosts and record the output
#[derive(Parser, Debug)]
#[command(name = "hostrun", version, about, long_about = None)]
pub struct Args {
    /// Semicolon separated list of commands to run (comma when no semicolon)
    #[arg(long)]
    pub commands: Option<String>,

    /// Path to file containing commands to run (one per line)
    #[arg(long, value_name = "PATH")]
    pub command_file: Option<PathBuf>,

    /// Report file the output is appended to
    #[arg(long, default_value = "output.txt")]
    pub name: PathBuf,

    /// Host list, one address per line
    #[arg(long, default_value = DEFAULT_HOSTS_FILE)]
    pub hosts_file: PathBuf,

    /// Env file holding the SSH_* credential variables
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// SSH port used for every host
    #[arg(long, default_value_t = DEFAULT_SSH_PORT)]
    pub port: u16,

    /// Abort a single command after this many seconds
    #[arg(long, value_name = "SECS")]
    pub command_timeout: Option<u64>,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Settings passed to the run aggregator
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        let config = RunConfig::default().with_port(self.port);
        match self.command_timeout {
            Some(secs) => config.with_command_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}
