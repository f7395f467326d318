//! Login and elevation credentials

use std::fmt;

/// Username/password login plus the password fed to `sudo -S`
///
/// Shared read-only across every host of a run. The `Debug` output never
/// contains either password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    username: String,
    password: String,
    elevation_password: String,
}

impl Credential {
    /// Create a credential
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        elevation_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            elevation_password: elevation_password.into(),
        }
    }

    /// Login user name
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Password piped to the privilege-escalation prefix
    #[must_use]
    pub fn elevation_password(&self) -> &str {
        &self.elevation_password
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("elevation_password", &"<redacted>")
            .finish()
    }
}
