//! SSH transport using russh crate

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use russh::keys::ssh_key;
use russh::{Channel, ChannelMsg, Disconnect, client};
use tracing::{debug, info, instrument};

use crate::credential::Credential;
use crate::error::ExecError;
use crate::result::{Capture, ConnectionInfo, ExitState};
use crate::traits::{Connection, Connector, ExecutionContext};

/// Extended data stream carrying stderr (`SSH_EXTENDED_DATA_STDERR`)
const STDERR_STREAM: u32 = 1;

/// SSH client handler for russh
#[derive(Debug)]
struct SshClientHandler;

impl client::Handler for SshClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &ssh_key::PublicKey,
    ) -> Result<bool, Self::Error> {
        // Accept all server keys (like StrictHostKeyChecking=no)
        Ok(true)
    }
}

/// Password-authenticated SSH connector
#[derive(Debug, Clone)]
pub struct SshConnector {
    config: Arc<client::Config>,
}

impl SshConnector {
    /// Create a connector with russh default timeouts
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Arc::new(client::Config::default()),
        }
    }
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for SshConnector {
    #[instrument(skip(self, target, credential), fields(host = %target.host, port = target.port))]
    async fn connect(
        &self,
        target: &ConnectionInfo,
        credential: &Credential,
    ) -> Result<Box<dyn Connection>, ExecError> {
        info!(user = %credential.username(), "connecting to SSH");

        let mut session = client::connect(
            Arc::clone(&self.config),
            (&target.host[..], target.port),
            SshClientHandler,
        )
        .await
        .map_err(|e| ExecError::ConnectionFailed(e.to_string()))?;

        let rejection = match session
            .authenticate_password(credential.username(), credential.password())
            .await
        {
            Ok(auth_res) if auth_res.success() => None,
            Ok(_) => Some("password authentication rejected".to_string()),
            Err(e) => Some(e.to_string()),
        };

        if let Some(reason) = rejection {
            // Close the transport so the server sees an orderly disconnect
            session
                .disconnect(Disconnect::ByApplication, "", "English")
                .await
                .ok();
            return Err(ExecError::AuthenticationFailed(reason));
        }

        info!("SSH connected and authenticated");

        Ok(Box::new(SshConnection {
            target: target.clone(),
            session,
        }))
    }

    fn connector_type(&self) -> &'static str {
        "ssh"
    }
}

/// Authenticated SSH session to one host
pub struct SshConnection {
    target: ConnectionInfo,
    session: client::Handle<SshClientHandler>,
}

impl std::fmt::Debug for SshConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshConnection")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connection for SshConnection {
    async fn open_context(&mut self) -> Result<Box<dyn ExecutionContext>, ExecError> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(|e| ExecError::SessionFailed(e.to_string()))?;

        Ok(Box::new(SshContext { channel }))
    }

    async fn close(self: Box<Self>) -> Result<(), ExecError> {
        self.session
            .disconnect(Disconnect::ByApplication, "", "English")
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;
        info!(host = %self.target.host, "SSH disconnected");
        Ok(())
    }
}

/// One SSH session channel
struct SshContext {
    channel: Channel<client::Msg>,
}

#[async_trait]
impl ExecutionContext for SshContext {
    async fn exec(&mut self, cmd: &str, capture: &mut Capture) -> Result<ExitState, ExecError> {
        let start = Instant::now();

        self.channel
            .exec(true, cmd)
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let mut exit = ExitState::Unknown;

        // Exit status may arrive after EOF, so drain until the channel closes
        while let Some(msg) = self.channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => {
                    capture.stdout.extend_from_slice(&data);
                }
                ChannelMsg::ExtendedData { data, ext } => {
                    if ext == STDERR_STREAM {
                        capture.stderr.extend_from_slice(&data);
                    }
                }
                ChannelMsg::ExitStatus { exit_status } => {
                    exit = ExitState::Status(exit_status);
                }
                ChannelMsg::ExitSignal { signal_name, .. } => {
                    exit = ExitState::Signal(format!("{signal_name:?}"));
                }
                _ => {}
            }
        }

        debug!(
            exit = %exit,
            stdout_bytes = capture.stdout.len(),
            stderr_bytes = capture.stderr.len(),
            duration = ?start.elapsed(),
            "remote command completed"
        );

        Ok(exit)
    }

    async fn close(self: Box<Self>) -> Result<(), ExecError> {
        self.channel
            .close()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        // Port 1 on loopback is closed on any sane test machine
        let connector = SshConnector::new();
        let target = ConnectionInfo::new("127.0.0.1").with_port(1);
        let cred = Credential::new("nobody", "pw", "pw");

        let result = connector.connect(&target, &cred).await;
        assert!(matches!(result, Err(ExecError::ConnectionFailed(_))));
    }

    #[tokio::test]
    #[ignore = "requires SSH server"]
    async fn test_wrong_password_is_authentication_error() {
        let host = std::env::var("HOSTRUN_TEST_HOST").unwrap();
        let cred = Credential::new(
            std::env::var("SSH_USERNAME").unwrap(),
            "definitely-not-the-password",
            "unused",
        );

        let result = SshConnector::new()
            .connect(&ConnectionInfo::new(host), &cred)
            .await;
        assert!(matches!(result, Err(ExecError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    #[ignore = "requires SSH server"]
    async fn test_ssh_whoami() {
        let host = std::env::var("HOSTRUN_TEST_HOST").unwrap();
        let cred = Credential::new(
            std::env::var("SSH_USERNAME").unwrap(),
            std::env::var("SSH_PASSWORD").unwrap(),
            std::env::var("SSH_SUDO_PASSWORD").unwrap(),
        );

        let mut conn = SshConnector::new()
            .connect(&ConnectionInfo::new(host), &cred)
            .await
            .unwrap();
        let mut ctx = conn.open_context().await.unwrap();
        let mut capture = Capture::default();
        let exit = ctx.exec("whoami", &mut capture).await.unwrap();
        ctx.close().await.ok();
        conn.close().await.unwrap();

        assert!(exit.success());
        assert!(!capture.stdout_lossy().trim().is_empty());
    }
}
