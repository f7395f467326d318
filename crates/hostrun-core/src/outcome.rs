//! Per-command outcome records

use std::time::Duration;

use hostrun_exec::{Capture, ExitState};

/// Result of running one command on one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    /// Host address as given in the host list
    pub host: String,
    /// Original (unprepared) command text
    pub command: String,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr, plus diagnostic text on failure
    pub stderr: String,
    /// Remote exit code, when one was reported
    pub exit_status: Option<u32>,
    /// Whether the command ran and exited with status 0
    pub succeeded: bool,
    /// Whether the command was sent to the host at all
    ///
    /// False only when no execution context could be opened. Such records
    /// get no report block.
    pub started: bool,
    /// Time from opening the context to the end of the command
    pub duration: Duration,
}

impl OutcomeRecord {
    /// Record from a command that ran to completion
    pub(crate) fn completed(
        host: &str,
        command: &str,
        capture: &Capture,
        exit: &ExitState,
        duration: Duration,
    ) -> Self {
        let mut stderr = capture.stderr_lossy();
        if !exit.success() {
            append_diagnostic(&mut stderr, &format!("remote command ended with {exit}"));
        }

        Self {
            host: host.to_string(),
            command: command.to_string(),
            stdout: capture.stdout_lossy(),
            stderr,
            exit_status: exit.code(),
            succeeded: exit.success(),
            started: true,
            duration,
        }
    }

    /// Record from a command that was sent but did not run to completion
    pub(crate) fn failed(
        host: &str,
        command: &str,
        capture: &Capture,
        diagnostic: &str,
        duration: Duration,
    ) -> Self {
        let mut stderr = capture.stderr_lossy();
        append_diagnostic(&mut stderr, diagnostic);

        Self {
            host: host.to_string(),
            command: command.to_string(),
            stdout: capture.stdout_lossy(),
            stderr,
            exit_status: None,
            succeeded: false,
            started: true,
            duration,
        }
    }

    /// Record from a command skipped because its context could not be opened
    pub(crate) fn not_started(
        host: &str,
        command: &str,
        diagnostic: &str,
        duration: Duration,
    ) -> Self {
        Self {
            host: host.to_string(),
            command: command.to_string(),
            stdout: String::new(),
            stderr: diagnostic.to_string(),
            exit_status: None,
            succeeded: false,
            started: false,
            duration,
        }
    }
}

fn append_diagnostic(stderr: &mut String, diagnostic: &str) {
    if !stderr.is_empty() && !stderr.ends_with('\n') {
        stderr.push('\n');
    }
    stderr.push_str(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(stdout: &str, stderr: &str) -> Capture {
        Capture {
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_completed_success() {
        let record = OutcomeRecord::completed(
            "10.0.0.1",
            "whoami",
            &capture("root\n", ""),
            &ExitState::Status(0),
            Duration::from_millis(5),
        );

        assert!(record.succeeded);
        assert_eq!(record.stdout, "root\n");
        assert_eq!(record.stderr, "");
        assert_eq!(record.exit_status, Some(0));
    }

    #[test]
    fn test_completed_nonzero_keeps_output() {
        let record = OutcomeRecord::completed(
            "10.0.0.1",
            "false",
            &capture("partial", "boom"),
            &ExitState::Status(1),
            Duration::ZERO,
        );

        assert!(!record.succeeded);
        assert_eq!(record.stdout, "partial");
        assert_eq!(record.stderr, "boom\nremote command ended with exit status 1");
        assert_eq!(record.exit_status, Some(1));
    }

    #[test]
    fn test_failed_appends_diagnostic() {
        let record = OutcomeRecord::failed(
            "h",
            "apt update",
            &capture("half", "E: lock"),
            "I/O error: connection reset",
            Duration::ZERO,
        );

        assert!(!record.succeeded);
        assert!(record.started);
        assert_eq!(record.stdout, "half");
        assert_eq!(record.stderr, "E: lock\nI/O error: connection reset");
        assert_eq!(record.exit_status, None);
    }

    #[test]
    fn test_not_started() {
        let record = OutcomeRecord::not_started(
            "h",
            "uptime",
            "failed to open session channel: refused",
            Duration::ZERO,
        );

        assert!(!record.succeeded);
        assert!(!record.started);
        assert!(record.stdout.is_empty());
        assert_eq!(record.stderr, "failed to open session channel: refused");
        assert_eq!(record.exit_status, None);
    }
}
