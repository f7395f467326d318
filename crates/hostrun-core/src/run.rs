//! Run aggregator
//!
//! Walks the host list strictly in order, one host and one command at a
//! time, and collects the outcome records host-major, command-minor.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hostrun_exec::{Connector, Credential};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::command::PreparedCommand;
use crate::config::RunConfig;
use crate::host::HostOrchestrator;
use crate::outcome::OutcomeRecord;
use crate::report::Report;

/// Cooperative stop signal checked before each host and each command
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Create a signal and the sender that triggers it
    #[must_use]
    pub fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// A signal that never fires
    #[must_use]
    pub fn never() -> Self {
        Self::new().1
    }

    /// Whether a stop was requested
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }
}

/// What a whole run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Rendered report, one block per record
    pub report: Report,
    /// Records in host-major, command-minor order
    pub records: Vec<OutcomeRecord>,
    /// Hosts processed (including unreachable ones)
    pub hosts_attempted: usize,
    /// Hosts that could not be connected to, with the cause
    pub unreachable: Vec<(String, String)>,
    /// Whether shutdown cut the run short
    pub cancelled: bool,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Number of successful records
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.succeeded).count()
    }

    /// Number of failed records
    #[must_use]
    pub fn failed(&self) -> usize {
        self.records.len() - self.succeeded()
    }

    /// Every host connected, every command succeeded, nothing was skipped
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unreachable.is_empty() && self.failed() == 0 && !self.cancelled
    }
}

/// Runs the command list over every host
#[derive(Debug)]
pub struct RunAggregator {
    orchestrator: HostOrchestrator,
    shutdown: Shutdown,
}

impl RunAggregator {
    /// Create an aggregator dialing through `connector`
    pub fn new(connector: Arc<dyn Connector>, config: &RunConfig) -> Self {
        Self {
            orchestrator: HostOrchestrator::new(connector, config),
            shutdown: Shutdown::never(),
        }
    }

    /// Stop starting new hosts and commands once `shutdown` fires
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.orchestrator = self.orchestrator.with_shutdown(shutdown.clone());
        self.shutdown = shutdown;
        self
    }

    /// Run `commands` on every host in order
    #[instrument(skip_all, fields(hosts = hosts.len(), commands = commands.len()))]
    pub async fn run<S: AsRef<str>>(
        &self,
        hosts: &[S],
        credential: &Credential,
        commands: &[PreparedCommand],
    ) -> RunSummary {
        let started_at = Utc::now();
        let mut records = Vec::with_capacity(hosts.len() * commands.len());
        let mut unreachable = Vec::new();
        let mut hosts_attempted = 0;
        let mut cancelled = false;

        for host in hosts {
            let host = host.as_ref();
            if self.shutdown.is_triggered() {
                warn!(
                    remaining = hosts.len() - hosts_attempted,
                    "shutdown requested, skipping remaining hosts"
                );
                cancelled = true;
                break;
            }

            hosts_attempted += 1;
            let outcome = self.orchestrator.process(host, credential, commands).await;

            cancelled |= outcome.cancelled;
            if let Some(cause) = outcome.connection_error {
                unreachable.push((outcome.host, cause));
            }
            records.extend(outcome.records);
        }

        let report = Report::from_records(&records);
        let finished_at = Utc::now();

        info!(
            blocks = report.len(),
            unreachable = unreachable.len(),
            cancelled,
            elapsed_ms = (finished_at - started_at).num_milliseconds(),
            "run complete"
        );

        RunSummary {
            report,
            records,
            hosts_attempted,
            unreachable,
            cancelled,
            started_at,
            finished_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_never_fires() {
        assert!(!Shutdown::never().is_triggered());
    }

    #[test]
    fn test_shutdown_trigger() {
        let (tx, shutdown) = Shutdown::new();
        let observer = shutdown.clone();
        assert!(!shutdown.is_triggered());

        tx.send(true).unwrap();
        assert!(shutdown.is_triggered());
        assert!(observer.is_triggered());
    }
}
