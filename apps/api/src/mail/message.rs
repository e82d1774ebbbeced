//! Outbound message type and builder.

use std::path::PathBuf;

use super::MailError;

/// A file attached to an outbound email. The bytes stay on disk until send time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    /// Filename presented to the recipient.
    pub filename: String,
    /// Where the content is stored locally.
    pub path: PathBuf,
}

/// A complete email ready to hand to a [`Mailer`](super::Mailer).
///
/// The sender address is always the configured account; only the display
/// name varies per message.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from_name: String,
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<EmailAttachment>,
}

impl OutboundEmail {
    pub fn builder() -> OutboundEmailBuilder {
        OutboundEmailBuilder::default()
    }
}

/// Builder for [`OutboundEmail`].
#[derive(Debug, Default)]
pub struct OutboundEmailBuilder {
    from_name: Option<String>,
    to: Option<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    html: Option<String>,
    attachments: Vec<EmailAttachment>,
}

impl OutboundEmailBuilder {
    pub fn from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = Some(address.into());
        self
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to = Some(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn attach(mut self, filename: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(EmailAttachment {
            filename: filename.into(),
            path: path.into(),
        });
        self
    }

    /// Build the email, validating required fields.
    pub fn build(self) -> Result<OutboundEmail, MailError> {
        let from_name = self
            .from_name
            .ok_or_else(|| MailError::Build("sender display name required".into()))?;
        let to = self
            .to
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| MailError::Build("recipient required".into()))?;
        let subject = self
            .subject
            .ok_or_else(|| MailError::Build("subject required".into()))?;
        let html = self
            .html
            .ok_or_else(|| MailError::Build("html body required".into()))?;

        Ok(OutboundEmail {
            from_name,
            to,
            reply_to: self.reply_to,
            subject,
            html,
            attachments: self.attachments,
        })
    }
}
