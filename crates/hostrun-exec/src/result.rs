//! Result types for command execution

use std::fmt;

/// SSH port used when the host list carries bare addresses
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Captured output of one command
///
/// The two buffers are independent sinks: bytes from the remote stdout
/// stream go to `stdout`, extended data stream 1 goes to `stderr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capture {
    /// stdout bytes
    pub stdout: Vec<u8>,
    /// stderr bytes
    pub stderr: Vec<u8>,
}

impl Capture {
    /// stdout decoded lossily as UTF-8
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// stderr decoded lossily as UTF-8
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// How the remote process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitState {
    /// Process exited with a status code
    Status(u32),
    /// Process was killed by a signal
    Signal(String),
    /// Channel closed without reporting an exit status
    Unknown,
}

impl ExitState {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, ExitState::Status(0))
    }

    /// Exit code, if the process reported one
    #[must_use]
    pub fn code(&self) -> Option<u32> {
        match self {
            ExitState::Status(code) => Some(*code),
            ExitState::Signal(_) | ExitState::Unknown => None,
        }
    }
}

impl fmt::Display for ExitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitState::Status(code) => write!(f, "exit status {code}"),
            ExitState::Signal(sig) => write!(f, "killed by signal {sig}"),
            ExitState::Unknown => f.write_str("no exit status"),
        }
    }
}

/// Connection target for SSH
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Host address
    pub host: String,
    /// Port (default 22)
    pub port: u16,
}

impl ConnectionInfo {
    /// Create new connection info on the default port
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
        }
    }

    /// Set custom port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` form used for dialing
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_addr() {
        let info = ConnectionInfo::new("10.0.0.1");
        assert_eq!(info.port, 22);
        assert_eq!(info.addr(), "10.0.0.1:22");
    }

    #[test]
    fn test_custom_port_addr() {
        let info = ConnectionInfo::new("bastion").with_port(2222);
        assert_eq!(info.addr(), "bastion:2222");
    }

    #[test]
    fn test_exit_state_success() {
        assert!(ExitState::Status(0).success());
        assert!(!ExitState::Status(1).success());
        assert!(!ExitState::Signal("KILL".to_string()).success());
        assert!(!ExitState::Unknown.success());
        assert_eq!(ExitState::Status(3).code(), Some(3));
        assert_eq!(ExitState::Unknown.code(), None);
    }

    #[test]
    fn test_capture_lossy() {
        let capture = Capture {
            stdout: b"root\n".to_vec(),
            stderr: vec![0xff, b'x'],
        };
        assert_eq!(capture.stdout_lossy(), "root\n");
        assert_eq!(capture.stderr_lossy(), "\u{fffd}x");
    }
}
