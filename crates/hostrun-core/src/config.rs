//! Run configuration

use std::time::Duration;

use hostrun_exec::DEFAULT_SSH_PORT;

/// Settings shared by every host of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// SSH port appended to every host address
    pub port: u16,
    /// Per-command limit; `None` waits for the remote process
    pub command_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SSH_PORT,
            command_timeout: None,
        }
    }
}

impl RunConfig {
    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bound each command's runtime
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }
}
