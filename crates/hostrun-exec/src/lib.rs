//! hostrun-exec: Remote execution transport
//!
//! Traits for connecting to a host and running single commands over
//! single-use execution contexts, plus the SSH implementation on russh.

pub mod credential;
pub mod error;
pub mod result;
pub mod ssh;
pub mod traits;

pub use credential::Credential;
pub use error::ExecError;
pub use result::{Capture, ConnectionInfo, DEFAULT_SSH_PORT, ExitState};
pub use ssh::SshConnector;
pub use traits::{Connection, Connector, ExecutionContext};
