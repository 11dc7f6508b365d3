//! Transport seam

#[cfg(test)]
use mockall::mock;

use super::{Attachment, SmtpConfig};

/// A message ready to hand to a transport. Header values are already
/// canonicalized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    /// The `From` header
    pub from: String,

    /// The `To` header, empty when there are no recipients
    pub to: String,

    /// The `Cc` header, empty when there are none
    pub cc: String,

    /// The `Bcc` recipients, empty when there are none
    pub bcc: String,

    /// The `Reply-To` header, empty when there are none
    pub reply_to: String,

    /// The `Subject` header
    pub subject: String,

    /// The HTML body
    pub html: String,

    /// Attachments in the order they were added
    pub attachments: Vec<Attachment>,
}

/// Delivers messages over SMTP
pub trait Transport: Send + Sync {
    /// Connect, authenticate and transmit `message` in a single blocking call.
    ///
    /// # Arguments
    /// * `message` - The [`OutgoingMessage`] to send.
    /// * `smtp` - The [`SmtpConfig`] to connect with.
    ///
    /// # Returns
    /// [`Ok`] once the server has accepted the message.
    fn dial_and_send(&self, message: &OutgoingMessage, smtp: &SmtpConfig) -> anyhow::Result<()>;
}

#[cfg(test)]
mock! {
    pub Transport {}

    impl Transport for Transport {
        fn dial_and_send(&self, message: &OutgoingMessage, smtp: &SmtpConfig) -> anyhow::Result<()>;
    }
}
