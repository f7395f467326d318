//! Host orchestrator
//!
//! Connects to one host, runs every prepared command on it in order, and
//! releases the connection.

use std::sync::Arc;

use hostrun_exec::{ConnectionInfo, Connector, Credential};
use tracing::{debug, info, instrument, warn};

use crate::command::PreparedCommand;
use crate::config::RunConfig;
use crate::outcome::OutcomeRecord;
use crate::run::Shutdown;
use crate::session::SessionExecutor;
use crate::state::HostState;

/// Everything one host contributed to a run
#[derive(Debug, Clone)]
pub struct HostOutcome {
    /// Host address as given in the host list
    pub host: String,
    /// Why the connection could not be established, if it wasn't
    pub connection_error: Option<String>,
    /// One record per command attempted, in command order
    pub records: Vec<OutcomeRecord>,
    /// Whether shutdown stopped the command loop early
    pub cancelled: bool,
}

impl HostOutcome {
    /// Whether a connection was established
    #[must_use]
    pub fn connected(&self) -> bool {
        self.connection_error.is_none()
    }
}

/// Drives the session executor across the commands for one host
pub struct HostOrchestrator {
    connector: Arc<dyn Connector>,
    executor: SessionExecutor,
    port: u16,
    shutdown: Shutdown,
}

impl std::fmt::Debug for HostOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostOrchestrator")
            .field("connector", &self.connector.connector_type())
            .field("executor", &self.executor)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl HostOrchestrator {
    /// Create an orchestrator dialing through `connector`
    pub fn new(connector: Arc<dyn Connector>, config: &RunConfig) -> Self {
        Self {
            connector,
            executor: SessionExecutor::new().with_timeout(config.command_timeout),
            port: config.port,
            shutdown: Shutdown::never(),
        }
    }

    /// Stop starting new commands once `shutdown` fires
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Process one host
    ///
    /// A connection failure skips the host and yields no records. Otherwise
    /// every command is attempted in order whatever the earlier ones did,
    /// and the connection is closed before returning.
    #[instrument(skip(self, host, credential, commands), fields(host = %host))]
    pub async fn process(
        &self,
        host: &str,
        credential: &Credential,
        commands: &[PreparedCommand],
    ) -> HostOutcome {
        let mut state = StateTracker::new(host);
        let target = ConnectionInfo::new(host).with_port(self.port);

        let mut connection = match self.connector.connect(&target, credential).await {
            Ok(connection) => connection,
            Err(e) => {
                warn!(
                    addr = %target.addr(),
                    error = %e,
                    "error creating connection, skipping host"
                );
                state.advance(HostState::Closed);
                return HostOutcome {
                    host: host.to_string(),
                    connection_error: Some(e.to_string()),
                    records: Vec::new(),
                    cancelled: false,
                };
            }
        };
        state.advance(HostState::Connected);

        let mut records = Vec::with_capacity(commands.len());
        let mut cancelled = false;

        for command in commands {
            if self.shutdown.is_triggered() {
                warn!(
                    remaining = commands.len() - records.len(),
                    "shutdown requested, skipping remaining commands"
                );
                cancelled = true;
                break;
            }

            state.advance(HostState::Executing);
            let record = self.executor.run(connection.as_mut(), host, command).await;

            if !record.started {
                warn!(
                    command = %command,
                    error = %record.stderr,
                    "error opening session, skipping command"
                );
            } else if !record.succeeded {
                warn!(
                    command = %command,
                    stderr = %record.stderr.trim(),
                    "error running command"
                );
            }

            state.advance(HostState::Recorded);
            records.push(record);
        }

        if let Err(e) = connection.close().await {
            warn!(error = %e, "failed to close connection");
        }
        state.advance(HostState::Closed);

        info!(
            commands = records.len(),
            failed = records.iter().filter(|r| !r.succeeded).count(),
            "host done"
        );

        HostOutcome {
            host: host.to_string(),
            connection_error: None,
            records,
            cancelled,
        }
    }
}

/// Tracks the per-host state machine
struct StateTracker<'a> {
    host: &'a str,
    state: HostState,
}

impl<'a> StateTracker<'a> {
    fn new(host: &'a str) -> Self {
        Self {
            host,
            state: HostState::Unconnected,
        }
    }

    fn advance(&mut self, next: HostState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid host transition {} -> {next}",
            self.state
        );
        debug!(host = %self.host, from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}
