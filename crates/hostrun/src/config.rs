//! Run inputs: credentials, host list and command list
//!
//! Everything here runs before the first connection is attempted, so any
//! error is a configuration error that aborts the run.

use std::path::Path;

use hostrun_core::{CoreError, Credential, parse_command_lines, split_command_list};
use tracing::debug;

/// Host list read when present
pub const DEFAULT_HOSTS_FILE: &str = "VM_ListSSH.txt";

const USERNAME_VAR: &str = "SSH_USERNAME";
const PASSWORD_VAR: &str = "SSH_PASSWORD";
const SUDO_PASSWORD_VAR: &str = "SSH_SUDO_PASSWORD";
const HOSTNAME_VAR: &str = "SSH_HOSTNAME";

/// Load `KEY=value` pairs from an env file into the process environment
///
/// A missing file is fine as long as the variables are already set.
/// Variables already present in the environment are not overridden.
///
/// # Errors
/// Returns `CoreError::ConfigError` if the file exists but cannot be parsed
pub fn load_env_file(path: &Path) -> Result<(), CoreError> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            debug!(path = %path.display(), "loaded env file");
            Ok(())
        }
        Err(e) if e.not_found() => {
            debug!(path = %path.display(), "no env file, using process environment");
            Ok(())
        }
        Err(e) => Err(CoreError::ConfigError(format!(
            "error loading {}: {e}",
            path.display()
        ))),
    }
}

/// Credentials and optional fallback host from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    /// Login and elevation credential
    pub credential: Credential,
    /// Host used when no host list file exists
    pub default_host: Option<String>,
}

impl Settings {
    /// Read settings from the process environment
    ///
    /// # Errors
    /// Returns `CoreError::ConfigError` if a credential variable is unset or empty
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        match (get(USERNAME_VAR), get(PASSWORD_VAR), get(SUDO_PASSWORD_VAR)) {
            (Some(username), Some(password), Some(sudo_password)) => Ok(Self {
                credential: Credential::new(username, password, sudo_password),
                default_host: get(HOSTNAME_VAR).map(|h| h.trim().to_string()),
            }),
            _ => Err(CoreError::ConfigError(format!(
                "{USERNAME_VAR} or {PASSWORD_VAR} or {SUDO_PASSWORD_VAR} environment variables not set"
            ))),
        }
    }
}

/// Where the host list came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSource {
    /// Read from a host list file
    File,
    /// The single `SSH_HOSTNAME` fallback
    Default,
}

/// Resolve the ordered host list
///
/// The host file wins when it exists; otherwise the default host is used.
///
/// # Errors
/// Returns `CoreError::ConfigError` if neither source yields a host or the
/// file cannot be read
pub fn resolve_hosts(
    hosts_file: &Path,
    default_host: Option<&str>,
) -> Result<(Vec<String>, HostSource), CoreError> {
    if hosts_file.exists() {
        let content = std::fs::read_to_string(hosts_file).map_err(|e| {
            CoreError::ConfigError(format!("can't read host list {}: {e}", hosts_file.display()))
        })?;
        let hosts = parse_command_lines(&content);
        if hosts.is_empty() {
            return Err(CoreError::ConfigError(format!(
                "host list {} contains no hosts",
                hosts_file.display()
            )));
        }
        return Ok((hosts, HostSource::File));
    }

    match default_host {
        Some(host) if !host.is_empty() => Ok((vec![host.to_string()], HostSource::Default)),
        _ => Err(CoreError::ConfigError(format!(
            "{} not found and {HOSTNAME_VAR} not set",
            hosts_file.display()
        ))),
    }
}

/// Resolve the raw command list
///
/// Commands from `command_file` take precedence; the inline list is used
/// when no file is given or the file holds no commands. Returns the commands
/// and whether they came from the file.
///
/// # Errors
/// Returns `CoreError::ConfigError` if the command file cannot be read
pub fn resolve_commands(
    command_file: Option<&Path>,
    inline: Option<&str>,
) -> Result<(Vec<String>, bool), CoreError> {
    if let Some(path) = command_file {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!("error opening command file {}: {e}", path.display()))
        })?;
        let commands = parse_command_lines(&content);
        if !commands.is_empty() {
            return Ok((commands, true));
        }
    }

    Ok((inline.map(split_command_list).unwrap_or_default(), false))
}
