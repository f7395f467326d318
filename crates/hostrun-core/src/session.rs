//! Remote session executor
//!
//! Runs one prepared command on an established connection through its own
//! execution context and turns whatever happened into an `OutcomeRecord`.

use std::time::{Duration, Instant};

use hostrun_exec::{Capture, Connection, ExecError, ExecutionContext, ExitState};
use tokio::time::timeout;
use tracing::{debug, error, instrument};

use crate::command::PreparedCommand;
use crate::outcome::OutcomeRecord;

/// Runs single commands, one execution context each
#[derive(Debug, Clone, Default)]
pub struct SessionExecutor {
    command_timeout: Option<Duration>,
}

impl SessionExecutor {
    /// Create an executor that waits for every command to finish
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up on commands running longer than `limit`
    #[must_use]
    pub fn with_timeout(mut self, limit: Option<Duration>) -> Self {
        self.command_timeout = limit;
        self
    }

    /// Run `command` on `connection`
    ///
    /// Never fails: transport errors become an unsuccessful record, and a
    /// context that cannot be opened yields a record marked as not started. The
    /// execution context is closed before returning on every path and the
    /// command is never retried.
    #[instrument(skip(self, connection, host, command), fields(command = %command))]
    pub async fn run(
        &self,
        connection: &mut dyn Connection,
        host: &str,
        command: &PreparedCommand,
    ) -> OutcomeRecord {
        let start = Instant::now();
        let mut capture = Capture::default();

        let mut context = match connection.open_context().await {
            Ok(context) => context,
            Err(e) => {
                return OutcomeRecord::not_started(
                    host,
                    command.original(),
                    &e.to_string(),
                    start.elapsed(),
                );
            }
        };

        let result = self
            .exec(context.as_mut(), command.prepared(), &mut capture)
            .await;

        if let Err(e) = context.close().await {
            debug!(error = %e, "closing execution context failed");
        }

        match result {
            Ok(exit) => {
                OutcomeRecord::completed(host, command.original(), &capture, &exit, start.elapsed())
            }
            Err(e) => OutcomeRecord::failed(
                host,
                command.original(),
                &capture,
                &e.to_string(),
                start.elapsed(),
            ),
        }
    }

    async fn exec(
        &self,
        context: &mut dyn ExecutionContext,
        cmd: &str,
        capture: &mut Capture,
    ) -> Result<ExitState, ExecError> {
        let Some(limit) = self.command_timeout else {
            return context.exec(cmd, capture).await;
        };

        match timeout(limit, context.exec(cmd, capture)).await {
            Ok(result) => result,
            Err(_) => {
                error!(timeout = ?limit, "command timed out");
                Err(ExecError::Timeout { timeout: limit })
            }
        }
    }
}
