//! SMTP transport implementation

use std::{fs, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lettre::{
    message::{
        header::ContentType, Attachment as AttachmentPart, Mailbox, Mailboxes, MultiPart,
        SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    Message, SmtpTransport, Transport as _,
};
use mime_guess::Mime;
use tracing::debug;

use crate::domain::mail::{Attachment, OutgoingMessage, SmtpConfig, Transport};

/// The port conventionally used for SMTP over implicit TLS
pub const SMTPS_PORT: u16 = 465;

/// SMTP transport configuration
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct SmtpTransportConfig {
    /// Force STARTTLS (`true`) or implicit TLS (`false`). When unset, port 465
    /// uses implicit TLS and every other port upgrades with STARTTLS if the
    /// server offers it.
    #[clap(long, env = "SMTP_STARTTLS", action = clap::ArgAction::Set)]
    pub starttls: Option<bool>,

    /// Verify the TLS certificate
    #[clap(long, env = "SMTP_VERIFY_TLS", default_value_t = true, action = clap::ArgAction::Set)]
    pub verify_tls: bool,

    /// Connection timeout in seconds
    #[clap(long, env = "SMTP_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

impl Default for SmtpTransportConfig {
    fn default() -> Self {
        Self {
            starttls: None,
            verify_tls: true,
            timeout: 30,
        }
    }
}

/// How the connection is secured
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS from the first byte
    Wrapper,

    /// STARTTLS when the server offers it, plain text otherwise
    Opportunistic,

    /// STARTTLS, failing if the server does not offer it
    Required,
}

impl SmtpTransportConfig {
    /// The TLS mode used for a connection to `port`
    pub fn tls_mode(&self, port: u16) -> TlsMode {
        match self.starttls {
            Some(true) => TlsMode::Required,
            Some(false) => TlsMode::Wrapper,
            None if port == SMTPS_PORT => TlsMode::Wrapper,
            None => TlsMode::Opportunistic,
        }
    }
}

/// SMTP mailer
#[derive(Debug, Default, Clone)]
pub struct SmtpMailer {
    config: SmtpTransportConfig,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpTransportConfig) -> Self {
        Self { config }
    }

    /// Build a transport for the given connection parameters
    pub fn mailer(&self, smtp: &SmtpConfig) -> Result<SmtpTransport> {
        let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());

        let tls_parameters = TlsParameters::builder(smtp.host.to_string())
            .dangerous_accept_invalid_certs(!self.config.verify_tls)
            .build()?;

        let (relay, tls) = match self.config.tls_mode(smtp.port) {
            TlsMode::Wrapper => (SmtpTransport::relay(&smtp.host)?, Tls::Wrapper(tls_parameters)),
            TlsMode::Opportunistic => (
                SmtpTransport::starttls_relay(&smtp.host)?,
                Tls::Opportunistic(tls_parameters),
            ),
            TlsMode::Required => (
                SmtpTransport::starttls_relay(&smtp.host)?,
                Tls::Required(tls_parameters),
            ),
        };

        Ok(relay
            .credentials(creds)
            .port(smtp.port)
            .tls(tls)
            .timeout(Some(Duration::from_secs(self.config.timeout)))
            .build())
    }
}

impl Transport for SmtpMailer {
    #[mutants::skip]
    fn dial_and_send(&self, message: &OutgoingMessage, smtp: &SmtpConfig) -> Result<()> {
        let email = build_message(message)?;

        debug!("dialing {}:{}", smtp.host, smtp.port);

        self.mailer(smtp)?.send(&email)?;

        Ok(())
    }
}

/// Converts an [`OutgoingMessage`] into a [`lettre::Message`], reading any
/// file attachments from disk.
pub fn build_message(message: &OutgoingMessage) -> Result<Message> {
    let mut builder = Message::builder()
        .from(
            message
                .from
                .parse::<Mailbox>()
                .with_context(|| format!("invalid from address: {}", message.from))?,
        )
        .subject(message.subject.clone());

    for mailbox in parse_mailboxes(&message.to)? {
        builder = builder.to(mailbox);
    }

    for mailbox in parse_mailboxes(&message.cc)? {
        builder = builder.cc(mailbox);
    }

    for mailbox in parse_mailboxes(&message.bcc)? {
        builder = builder.bcc(mailbox);
    }

    for mailbox in parse_mailboxes(&message.reply_to)? {
        builder = builder.reply_to(mailbox);
    }

    if message.attachments.is_empty() {
        return Ok(builder.singlepart(SinglePart::html(message.html.clone()))?);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::html(message.html.clone()));

    for attachment in &message.attachments {
        body = body.singlepart(attachment_part(attachment)?);
    }

    Ok(builder.multipart(body)?)
}

fn parse_mailboxes(header: &str) -> Result<Mailboxes> {
    if header.trim().is_empty() {
        return Ok(Mailboxes::new());
    }

    header
        .parse::<Mailboxes>()
        .with_context(|| format!("invalid address list: {}", header))
}

fn attachment_part(attachment: &Attachment) -> Result<SinglePart> {
    let (filename, content) = match attachment {
        Attachment::File(path) => {
            let content = fs::read(path)
                .with_context(|| format!("could not read attachment {}", path.display()))?;

            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());

            (filename, content)
        }
        Attachment::Inline { content, filename } => (filename.clone(), content.clone()),
    };

    let content_type = ContentType::parse(content_type_for(&filename).as_ref())?;

    Ok(AttachmentPart::new(filename).body(content, content_type))
}

/// Guesses a MIME type from a filename's extension, falling back to
/// `application/octet-stream`.
pub fn content_type_for(filename: &str) -> Mime {
    mime_guess::from_path(filename).first_or_octet_stream()
}
