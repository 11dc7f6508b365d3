//! SMTP connection parameters

use std::fmt;

/// SMTP connection parameters. Not a live connection.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SmtpConfig {
    /// The SMTP host
    pub host: String,

    /// The SMTP port
    pub port: u16,

    /// The SMTP username
    pub username: String,

    /// The SMTP password
    pub password: String,
}

impl SmtpConfig {
    /// Create new connection parameters
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when every field holds its zero value
    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
            && self.port == 0
            && self.username.is_empty()
            && self.password.is_empty()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}
