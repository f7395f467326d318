//! Command preparation
//!
//! Turns raw command strings into the `sudo -S` form sent to remote hosts.

use std::fmt;

/// A raw command wrapped for privilege escalation
///
/// `prepared` embeds the elevation password, so `Debug` and `Display` only
/// ever show the original text.
#[derive(Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    original: String,
    prepared: String,
}

impl PreparedCommand {
    /// Wrap `original` so `elevation_password` is piped into `sudo -S`
    pub fn new(original: impl Into<String>, elevation_password: &str) -> Self {
        let original = original.into();
        let prepared = format!(
            "echo {} | sudo -S {original}",
            shell_quote(elevation_password)
        );
        Self { original, prepared }
    }

    /// Command text as the operator wrote it
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Full text submitted to the remote shell
    #[must_use]
    pub fn prepared(&self) -> &str {
        &self.prepared
    }
}

impl fmt::Debug for PreparedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreparedCommand")
            .field("original", &self.original)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PreparedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Prepare every non-empty command, preserving order
pub fn prepare_commands<I, S>(raw: I, elevation_password: &str) -> Vec<PreparedCommand>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .filter_map(|cmd| {
            let cmd = cmd.as_ref().trim();
            (!cmd.is_empty()).then(|| PreparedCommand::new(cmd, elevation_password))
        })
        .collect()
}

/// Split an inline command list
///
/// `;` is the separator. A list without any `;` is split on `,` instead.
#[must_use]
pub fn split_command_list(list: &str) -> Vec<String> {
    let sep = if list.contains(';') { ';' } else { ',' };
    list.split(sep)
        .map(str::trim)
        .filter(|cmd| !cmd.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// One command per line, blank lines skipped
#[must_use]
pub fn parse_command_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Single-quote `s` for a POSIX shell
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
