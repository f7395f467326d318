//! Remote transport traits
//!
//! A `Connector` dials one host and hands back a `Connection`. Each command
//! runs on its own `ExecutionContext` opened from that connection. Both
//! resources are closed by consuming them, so a closed resource cannot be
//! reused.

use async_trait::async_trait;

use crate::credential::Credential;
use crate::error::ExecError;
use crate::result::{Capture, ConnectionInfo, ExitState};

/// Establishes authenticated connections
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect and authenticate to `target`
    async fn connect(
        &self,
        target: &ConnectionInfo,
        credential: &Credential,
    ) -> Result<Box<dyn Connection>, ExecError>;

    /// Short name of the transport, used in logs
    fn connector_type(&self) -> &'static str;
}

/// A live connection bound to a single host
#[async_trait]
pub trait Connection: Send {
    /// Open a single-use context for one command
    async fn open_context(&mut self) -> Result<Box<dyn ExecutionContext>, ExecError>;

    /// Release the connection
    async fn close(self: Box<Self>) -> Result<(), ExecError>;
}

/// A single-use channel running exactly one command
#[async_trait]
pub trait ExecutionContext: Send {
    /// Run `cmd` to completion, writing output into `capture`
    ///
    /// Output received before a transport error stays in `capture`.
    async fn exec(&mut self, cmd: &str, capture: &mut Capture) -> Result<ExitState, ExecError>;

    /// Release the context
    async fn close(self: Box<Self>) -> Result<(), ExecError>;
}
