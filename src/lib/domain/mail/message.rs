//! Email message builder

use std::path::PathBuf;

use tracing::debug;

use super::{
    format_address, format_address_list, Address, Attachment, OutgoingMessage, SendError,
    SmtpConfig, Transport, ValidationError,
};

/// An outbound HTML email, built up field by field and sent through a
/// [`Transport`].
///
/// A message can be sent any number of times; nothing is cleared after
/// sending.
#[derive(Clone, Debug, Default)]
pub struct Message {
    from: Address,
    to: Vec<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    reply_to: Vec<Address>,
    subject: String,
    body: String,
    attachments: Vec<Attachment>,
    smtp: Option<SmtpConfig>,
}

impl Message {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sender, replacing any previous one.
    pub fn set_from(&mut self, address: impl Into<String>, name: impl Into<String>) {
        self.from = Address::new(address, name);
    }

    /// Sets the subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// Sets the HTML body.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Sets the SMTP connection parameters.
    pub fn set_smtp(
        &mut self,
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) {
        self.smtp = Some(SmtpConfig::new(host, port, username, password));
    }

    /// Appends a `To` recipient.
    pub fn add_recipient(&mut self, address: impl Into<String>, name: impl Into<String>) {
        self.to.push(Address::new(address, name));
    }

    /// Appends a `Cc` recipient.
    pub fn add_cc(&mut self, address: impl Into<String>, name: impl Into<String>) {
        self.cc.push(Address::new(address, name));
    }

    /// Appends a `Bcc` recipient.
    pub fn add_bcc(&mut self, address: impl Into<String>, name: impl Into<String>) {
        self.bcc.push(Address::new(address, name));
    }

    /// Appends a `Reply-To` address.
    pub fn add_reply_to(&mut self, address: impl Into<String>, name: impl Into<String>) {
        self.reply_to.push(Address::new(address, name));
    }

    /// Appends a file attachment. The path is kept verbatim and only read by
    /// the transport.
    pub fn add_attachment(&mut self, path: impl Into<PathBuf>) {
        self.attachments.push(Attachment::file(path));
    }

    /// Appends an attachment whose content is `data`, presented as `filename`.
    pub fn add_string_attachment(&mut self, data: impl Into<String>, filename: impl Into<String>) {
        self.attachments
            .push(Attachment::inline(data.into().into_bytes(), filename));
    }

    /// Removes every `To` recipient.
    pub fn clear_recipients(&mut self) {
        self.to.clear();
    }

    /// Removes every `Cc` recipient.
    pub fn clear_ccs(&mut self) {
        self.cc.clear();
    }

    /// Removes every `Bcc` recipient.
    pub fn clear_bccs(&mut self) {
        self.bcc.clear();
    }

    /// Removes every `Reply-To` address.
    pub fn clear_reply_tos(&mut self) {
        self.reply_to.clear();
    }

    /// Removes `To`, `Cc` and `Bcc` recipients. `Reply-To` is kept.
    pub fn clear_all_recipients(&mut self) {
        self.clear_recipients();
        self.clear_ccs();
        self.clear_bccs();
    }

    /// Removes every attachment.
    pub fn clear_attachments(&mut self) {
        self.attachments.clear();
    }

    /// The sender
    pub fn from(&self) -> &Address {
        &self.from
    }

    /// `To` recipients in insertion order
    pub fn to(&self) -> &[Address] {
        &self.to
    }

    /// `Cc` recipients in insertion order
    pub fn cc(&self) -> &[Address] {
        &self.cc
    }

    /// `Bcc` recipients in insertion order
    pub fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    /// `Reply-To` addresses in insertion order
    pub fn reply_to(&self) -> &[Address] {
        &self.reply_to
    }

    /// The subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The HTML body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Attachments in insertion order
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// The SMTP connection parameters, if any were set
    pub fn smtp(&self) -> Option<&SmtpConfig> {
        self.smtp.as_ref()
    }

    /// Checks that every field needed to send is present.
    ///
    /// # Returns
    /// - [`Ok`] if the message can be sent. `To` recipients are not required.
    /// - [`Err`] with the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validated_smtp().map(|_| ())
    }

    /// Builds the headers, body and attachments handed to the transport.
    pub fn to_outgoing(&self) -> OutgoingMessage {
        OutgoingMessage {
            from: format_address(&self.from),
            to: format_address_list(&self.to).join(", "),
            cc: format_address_list(&self.cc).join(", "),
            bcc: format_address_list(&self.bcc).join(", "),
            reply_to: format_address_list(&self.reply_to).join(", "),
            subject: self.subject.clone(),
            html: self.body.clone(),
            attachments: self.attachments.clone(),
        }
    }

    /// Validates the message and sends it with a single call to `transport`.
    ///
    /// # Arguments
    /// * `transport` - The [`Transport`] to deliver through.
    ///
    /// # Returns
    /// - [`Ok`] if the transport accepted the message.
    /// - [`Err`] with [`SendError::Validation`] if the message is incomplete.
    ///   The transport is not called.
    /// - [`Err`] with [`SendError::Transport`] holding the transport's error.
    pub fn send<T>(&self, transport: &T) -> Result<(), SendError>
    where
        T: Transport + ?Sized,
    {
        let smtp = self.validated_smtp()?;
        let outgoing = self.to_outgoing();

        debug!(
            "sending message to {} recipient(s) with {} attachment(s) via {}:{}",
            self.to.len() + self.cc.len() + self.bcc.len(),
            self.attachments.len(),
            smtp.host,
            smtp.port
        );

        transport.dial_and_send(&outgoing, smtp)?;

        Ok(())
    }

    fn validated_smtp(&self) -> Result<&SmtpConfig, ValidationError> {
        if self.from.address().is_empty() {
            return Err(ValidationError::FromNotSet);
        }

        if self.subject.is_empty() {
            return Err(ValidationError::SubjectNotSet);
        }

        if self.body.is_empty() {
            return Err(ValidationError::BodyNotSet);
        }

        let smtp = match &self.smtp {
            Some(smtp) if !smtp.is_empty() => smtp,
            _ => return Err(ValidationError::SmtpNotSet),
        };

        if smtp.host.is_empty() {
            return Err(ValidationError::HostNotSet);
        }

        if smtp.port == 0 {
            return Err(ValidationError::PortNotSet);
        }

        if smtp.username.is_empty() {
            return Err(ValidationError::UsernameNotSet);
        }

        if smtp.password.is_empty() {
            return Err(ValidationError::PasswordNotSet);
        }

        Ok(smtp)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use testresult::TestResult;

    use crate::domain::mail::tests::MockTransport;

    use super::*;

    fn complete_message() -> Message {
        let mut message = Message::new();

        message.set_from("alice@x.com", "Alice");
        message.set_subject("Hi");
        message.set_body("<p>hi</p>");
        message.set_smtp("smtp.x.com", 587, "u", "p");

        message
    }

    #[test]
    fn test_new_message_is_empty() {
        let message = Message::new();

        assert_eq!(message.from(), &Address::default());
        assert!(message.to().is_empty());
        assert!(message.cc().is_empty());
        assert!(message.bcc().is_empty());
        assert!(message.reply_to().is_empty());
        assert!(message.subject().is_empty());
        assert!(message.body().is_empty());
        assert!(message.attachments().is_empty());
        assert!(message.smtp().is_none());
    }

    #[test]
    fn test_recipients_keep_insertion_order_and_duplicates() {
        let mut message = Message::new();

        message.add_recipient("b@x", "B");
        message.add_recipient("a@x", "A");
        message.add_recipient("b@x", "B");
        message.add_cc("c@x", "C");
        message.add_bcc("d@x", "D");
        message.add_reply_to("e@x", "E");

        assert_eq!(
            message.to(),
            &[
                Address::new("b@x", "B"),
                Address::new("a@x", "A"),
                Address::new("b@x", "B"),
            ]
        );
        assert_eq!(message.cc(), &[Address::new("c@x", "C")]);
        assert_eq!(message.bcc(), &[Address::new("d@x", "D")]);
        assert_eq!(message.reply_to(), &[Address::new("e@x", "E")]);
    }

    #[test]
    fn test_set_from_overwrites() {
        let mut message = Message::new();

        message.set_from("old@x", "Old");
        message.set_from("new@x", "New");

        assert_eq!(message.from(), &Address::new("new@x", "New"));
    }

    #[test]
    fn test_add_attachment_keeps_path_verbatim() {
        let mut message = Message::new();

        message.add_attachment("../docs/report.pdf");

        assert_eq!(
            message.attachments().first().map(ToString::to_string),
            Some("../docs/report.pdf".to_string())
        );
    }

    #[test]
    fn test_add_string_attachment() {
        let mut message = Message::new();

        message.add_string_attachment("hello", "note.txt");

        assert_eq!(
            message.attachments(),
            &[Attachment::inline("hello", "note.txt")]
        );
        assert_eq!(
            message.attachments().first().map(ToString::to_string),
            Some("hello;filename=note.txt".to_string())
        );
    }

    #[test]
    fn test_clear_operations() {
        let mut message = Message::new();

        message.add_recipient("a@x", "A");
        message.add_cc("c@x", "C");
        message.add_bcc("d@x", "D");
        message.add_reply_to("e@x", "E");
        message.add_attachment("a.txt");

        message.clear_recipients();
        assert!(message.to().is_empty());
        assert_eq!(message.cc().len(), 1);

        message.clear_ccs();
        assert!(message.cc().is_empty());

        message.clear_bccs();
        assert!(message.bcc().is_empty());

        message.clear_reply_tos();
        assert!(message.reply_to().is_empty());

        message.clear_attachments();
        assert!(message.attachments().is_empty());

        message.clear_attachments();
        assert!(message.attachments().is_empty());
    }

    #[test]
    fn test_clear_all_recipients_keeps_reply_to() {
        let mut message = Message::new();

        message.add_recipient("a@x", "A");
        message.add_cc("c@x", "C");
        message.add_bcc("d@x", "D");
        message.add_reply_to("e@x", "E");

        message.clear_all_recipients();

        assert!(message.to().is_empty());
        assert!(message.cc().is_empty());
        assert!(message.bcc().is_empty());
        assert_eq!(message.reply_to(), &[Address::new("e@x", "E")]);
    }

    #[test]
    fn test_empty_message_reports_from_first() {
        assert_eq!(Message::new().validate(), Err(ValidationError::FromNotSet));
    }

    #[test]
    fn test_validation_reports_first_missing_field() {
        let mut message = Message::new();
        message.set_from("alice@x.com", "");
        assert_eq!(message.validate(), Err(ValidationError::SubjectNotSet));

        message.set_subject("Hi");
        assert_eq!(message.validate(), Err(ValidationError::BodyNotSet));

        message.set_body("<p>hi</p>");
        assert_eq!(message.validate(), Err(ValidationError::SmtpNotSet));

        message.set_smtp("", 587, "", "");
        assert_eq!(message.validate(), Err(ValidationError::HostNotSet));

        message.set_smtp("smtp.x.com", 0, "", "");
        assert_eq!(message.validate(), Err(ValidationError::PortNotSet));

        message.set_smtp("smtp.x.com", 587, "", "");
        assert_eq!(message.validate(), Err(ValidationError::UsernameNotSet));

        message.set_smtp("smtp.x.com", 587, "u", "");
        assert_eq!(message.validate(), Err(ValidationError::PasswordNotSet));

        message.set_smtp("smtp.x.com", 587, "u", "p");
        assert_eq!(message.validate(), Ok(()));
    }

    #[test]
    fn test_from_name_alone_does_not_count_as_set() {
        let mut message = complete_message();

        message.set_from("", "Alice");

        assert_eq!(message.validate(), Err(ValidationError::FromNotSet));
    }

    #[test]
    fn test_body_checked_before_smtp() {
        let mut message = complete_message();

        message.set_body("");
        message.set_smtp("", 0, "", "");

        assert_eq!(message.validate(), Err(ValidationError::BodyNotSet));
    }

    #[test]
    fn test_all_zero_smtp_is_not_set() {
        let mut message = complete_message();

        message.set_smtp("", 0, "", "");

        assert_eq!(message.validate(), Err(ValidationError::SmtpNotSet));
    }

    #[test]
    fn test_validation_error_messages() {
        let cases = [
            (ValidationError::FromNotSet, "from is not set"),
            (ValidationError::SubjectNotSet, "subject is not set"),
            (ValidationError::BodyNotSet, "body is not set"),
            (ValidationError::SmtpNotSet, "smtp is not set"),
            (ValidationError::HostNotSet, "host is not set"),
            (ValidationError::PortNotSet, "port is not set"),
            (ValidationError::UsernameNotSet, "username is not set"),
            (ValidationError::PasswordNotSet, "password is not set"),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn test_message_without_recipients_is_valid() {
        let message = complete_message();

        assert!(message.to().is_empty());
        assert_eq!(message.validate(), Ok(()));
    }

    #[test]
    fn test_to_outgoing_formats_headers() {
        let mut message = complete_message();

        message.add_recipient("bob@x.com", "Bob");
        message.add_recipient("carol@x.com", "Carol");
        message.add_cc("dave@x.com", "Dave");
        message.add_reply_to("help@x.com", "Help");
        message.add_string_attachment("hello", "note.txt");

        let outgoing = message.to_outgoing();

        assert_eq!(outgoing.from, "Alice <alice@x.com>");
        assert_eq!(outgoing.to, "Bob <bob@x.com>, Carol <carol@x.com>");
        assert_eq!(outgoing.cc, "Dave <dave@x.com>");
        assert_eq!(outgoing.bcc, "");
        assert_eq!(outgoing.reply_to, "Help <help@x.com>");
        assert_eq!(outgoing.subject, "Hi");
        assert_eq!(outgoing.html, "<p>hi</p>");
        assert_eq!(outgoing.attachments, vec![Attachment::inline("hello", "note.txt")]);
    }

    #[test]
    fn test_send_success() -> TestResult {
        let mut message = complete_message();
        message.add_recipient("bob@x.com", "Bob");

        let mut transport = MockTransport::new();

        transport
            .expect_dial_and_send()
            .times(1)
            .withf(|message, smtp| {
                message.from == "Alice <alice@x.com>"
                    && message.to == "Bob <bob@x.com>"
                    && message.subject == "Hi"
                    && message.html == "<p>hi</p>"
                    && *smtp == SmtpConfig::new("smtp.x.com", 587, "u", "p")
            })
            .returning(|_, _| Ok(()));

        message.validate()?;
        message.send(&transport)?;

        Ok(())
    }

    #[test]
    fn test_send_with_unset_smtp_does_not_call_transport() {
        let mut message = complete_message();
        message.set_smtp("", 0, "", "");

        let mut transport = MockTransport::new();

        transport.expect_dial_and_send().times(0);

        let result = message.send(&transport);

        assert!(matches!(
            result,
            Err(SendError::Validation(ValidationError::SmtpNotSet))
        ));
        assert_eq!(result.unwrap_err().to_string(), "smtp is not set");
    }

    #[test]
    fn test_send_returns_transport_error_unchanged() {
        let message = complete_message();

        let mut transport = MockTransport::new();

        transport
            .expect_dial_and_send()
            .times(1)
            .returning(|_, _| Err(anyhow!("authentication rejected")));

        let result = message.send(&transport);

        assert!(matches!(result, Err(SendError::Transport(_))));
        assert_eq!(result.unwrap_err().to_string(), "authentication rejected");
    }

    #[test]
    fn test_send_passes_attachments_in_order() -> TestResult {
        let mut message = complete_message();
        message.add_attachment("/tmp/a.pdf");
        message.add_string_attachment("hello", "note.txt");

        let mut transport = MockTransport::new();

        transport
            .expect_dial_and_send()
            .times(1)
            .withf(|message, _| {
                message.attachments
                    == vec![
                        Attachment::file("/tmp/a.pdf"),
                        Attachment::inline("hello", "note.txt"),
                    ]
            })
            .returning(|_, _| Ok(()));

        message.send(&transport)?;

        Ok(())
    }

    #[test]
    fn test_sending_twice_calls_transport_twice() -> TestResult {
        let message = complete_message();

        let mut transport = MockTransport::new();

        transport
            .expect_dial_and_send()
            .times(2)
            .returning(|_, _| Ok(()));

        message.send(&transport)?;
        message.send(&transport)?;

        assert_eq!(message.subject(), "Hi");

        Ok(())
    }
}
