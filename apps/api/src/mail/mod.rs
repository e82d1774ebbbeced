//! Outbound email over SMTP.
//!
//! A thin layer over [lettre](https://lettre.rs). The [`Mailer`] trait is the
//! seam handlers depend on; [`SmtpMailer`] is the production implementation,
//! built once at startup and shared through `AppState`.

mod mailer;
mod message;

#[cfg(test)]
pub(crate) use mailer::compose;
pub use mailer::{parse_mailbox, MailConfig, Mailer, SmtpMailer};
pub use message::{EmailAttachment, OutboundEmail};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("failed to read attachment '{filename}': {source}")]
    Attachment {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SMTP error: {0}")]
    Smtp(String),
}
