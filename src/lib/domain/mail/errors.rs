//! Mail errors

use thiserror::Error;

/// A required field is missing. Checked in declaration order; the first
/// failure is reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The sender address is empty
    #[error("from is not set")]
    FromNotSet,

    /// The subject is empty
    #[error("subject is not set")]
    SubjectNotSet,

    /// The body is empty
    #[error("body is not set")]
    BodyNotSet,

    /// No SMTP parameters were given
    #[error("smtp is not set")]
    SmtpNotSet,

    /// The SMTP host is empty
    #[error("host is not set")]
    HostNotSet,

    /// The SMTP port is zero
    #[error("port is not set")]
    PortNotSet,

    /// The SMTP username is empty
    #[error("username is not set")]
    UsernameNotSet,

    /// The SMTP password is empty
    #[error("password is not set")]
    PasswordNotSet,
}

/// Errors returned when sending a message
#[derive(Debug, Error)]
pub enum SendError {
    /// The message failed validation and was not sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The transport reported a failure
    #[error(transparent)]
    Transport(anyhow::Error),
}

impl From<anyhow::Error> for SendError {
    fn from(err: anyhow::Error) -> Self {
        SendError::Transport(err)
    }
}
