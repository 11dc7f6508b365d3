#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Sends a single HTML email over SMTP

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use html_mailer::{
    domain::mail::Message,
    infrastructure::email::smtp::{SmtpMailer, SmtpTransportConfig},
};
use lettre::message::Mailbox;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The SMTP host
    #[clap(long, env = "SMTP_HOST", default_value = "")]
    pub host: String,

    /// The SMTP port
    #[clap(long, env = "SMTP_PORT", default_value_t = 0)]
    pub port: u16,

    /// The SMTP username
    #[clap(long, env = "SMTP_USER", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[clap(long, env = "SMTP_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// The SMTP transport configuration
    #[clap(flatten)]
    pub transport: SmtpTransportConfig,

    /// The sender address
    #[clap(long, env = "SMTP_SENDER", default_value = "")]
    pub from: String,

    /// The sender's display name
    #[clap(long, env = "SMTP_SENDER_NAME", default_value = "")]
    pub from_name: String,

    /// A recipient, as `address` or `Name <address>`
    #[clap(long)]
    pub to: Vec<String>,

    /// A carbon-copy recipient
    #[clap(long)]
    pub cc: Vec<String>,

    /// A blind carbon-copy recipient
    #[clap(long)]
    pub bcc: Vec<String>,

    /// A reply-to address
    #[clap(long)]
    pub reply_to: Vec<String>,

    /// The subject
    #[clap(long, default_value = "")]
    pub subject: String,

    /// The HTML body
    #[clap(long, default_value = "")]
    pub body: String,

    /// A file to attach
    #[clap(long)]
    pub attach: Vec<PathBuf>,
}

impl Args {
    /// Builds the message described by the arguments.
    pub fn message(&self) -> Result<Message> {
        let mut message = Message::new();

        message.set_from(&self.from, &self.from_name);
        message.set_subject(&self.subject);
        message.set_body(&self.body);
        message.set_smtp(&self.host, self.port, &self.username, &self.password);

        for raw in &self.to {
            let (address, name) = split_mailbox(raw)?;
            message.add_recipient(address, name);
        }

        for raw in &self.cc {
            let (address, name) = split_mailbox(raw)?;
            message.add_cc(address, name);
        }

        for raw in &self.bcc {
            let (address, name) = split_mailbox(raw)?;
            message.add_bcc(address, name);
        }

        for raw in &self.reply_to {
            let (address, name) = split_mailbox(raw)?;
            message.add_reply_to(address, name);
        }

        for path in &self.attach {
            message.add_attachment(path);
        }

        Ok(message)
    }
}

/// Splits `Name <address>` into `(address, name)`. A bare address has an
/// empty name.
fn split_mailbox(raw: &str) -> Result<(String, String)> {
    let mailbox = raw
        .parse::<Mailbox>()
        .with_context(|| format!("invalid address: {}", raw))?;

    Ok((mailbox.email.to_string(), mailbox.name.unwrap_or_default()))
}

#[mutants::skip]
fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let message = args.message()?;

    message.send(&SmtpMailer::new(args.transport.clone()))?;

    Ok(())
}
