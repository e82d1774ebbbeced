//! Mailer trait and SMTP implementation.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{EmailAttachment, MailError, OutboundEmail};

/// Port the provider serves implicit TLS on; anything else negotiates STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Async email sending trait.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver one email. Called at most once per request; never retried.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;

    /// Check that the provider accepts a connection with the configured account.
    async fn verify(&self) -> Result<(), MailError>;
}

/// Credentials and endpoint of the single mail account the relay sends from.
#[derive(Clone)]
pub struct MailConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// SMTP-based mailer using lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    account: Address,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, MailError> {
        let account: Address = config
            .user
            .parse()
            .map_err(|_| MailError::InvalidAddress(config.user.clone()))?;

        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| MailError::Smtp(e.to_string()))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport: Arc::new(transport),
            account,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let message = compose(&self.account, email).await?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;
        debug!(code = %response.code(), "SMTP accepted message");

        Ok(())
    }

    async fn verify(&self) -> Result<(), MailError> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Smtp("connection test was rejected".into())),
            Err(e) => Err(MailError::Smtp(e.to_string())),
        }
    }
}

/// An attachment read into memory, ready to be encoded into the message.
struct LoadedAttachment {
    filename: String,
    content_type: ContentType,
    body: Vec<u8>,
}

async fn load_attachments(
    attachments: &[EmailAttachment],
) -> Result<Vec<LoadedAttachment>, MailError> {
    let mut loaded = Vec::with_capacity(attachments.len());
    for attachment in attachments {
        let body = tokio::fs::read(&attachment.path)
            .await
            .map_err(|source| MailError::Attachment {
                filename: attachment.filename.clone(),
                source,
            })?;
        loaded.push(LoadedAttachment {
            filename: attachment.filename.clone(),
            content_type: content_type_for(&attachment.filename)?,
            body,
        });
    }
    Ok(loaded)
}

/// Guesses from the file extension, falling back to `application/octet-stream`.
fn content_type_for(filename: &str) -> Result<ContentType, MailError> {
    let guessed = mime_guess::from_path(filename).first_or_octet_stream();
    ContentType::parse(guessed.essence_str()).map_err(|e| MailError::Build(e.to_string()))
}

/// Parses a single address, optionally with a display name (`Name <a@b.c>`).
pub fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

/// Reads the attachments and builds the wire message sent as `account`.
pub(crate) async fn compose(account: &Address, email: &OutboundEmail) -> Result<Message, MailError> {
    let files = load_attachments(&email.attachments).await?;
    build_message(account, email, files)
}

/// Build a lettre `Message` from an [`OutboundEmail`] and its loaded attachments.
fn build_message(
    account: &Address,
    email: &OutboundEmail,
    attachments: Vec<LoadedAttachment>,
) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(Mailbox::new(Some(email.from_name.clone()), account.clone()))
        .to(parse_mailbox(&email.to)?)
        .subject(&email.subject);

    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    let html = SinglePart::html(email.html.clone());
    let message = if attachments.is_empty() {
        builder.singlepart(html)
    } else {
        let parts = attachments
            .into_iter()
            .fold(MultiPart::mixed().singlepart(html), |parts, file| {
                parts.singlepart(Attachment::new(file.filename).body(file.body, file.content_type))
            });
        builder.multipart(parts)
    };

    message.map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Address {
        "relay@example.com".parse().unwrap()
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(
            content_type_for("cv.pdf").unwrap(),
            ContentType::parse("application/pdf").unwrap()
        );
        assert_eq!(
            content_type_for("no_extension").unwrap(),
            ContentType::parse("application/octet-stream").unwrap()
        );
    }

    #[test]
    fn test_message_carries_reply_to_and_sender_name() {
        let email = OutboundEmail::builder()
            .from_name("Website Contact")
            .to("hr@example.com")
            .reply_to("visitor@example.org")
            .subject("Contact Form: New Inquiry")
            .html("<p>hello</p>")
            .build()
            .unwrap();

        let message = build_message(&account(), &email, Vec::new()).unwrap();
        let text = formatted(&message);

        assert!(text.contains("Reply-To: visitor@example.org"));
        assert!(text.contains("Website Contact"));
        assert!(text.contains("relay@example.com"));
        assert!(text.contains("Subject: Contact Form: New Inquiry"));
        assert!(text.contains("text/html"));
    }

    #[test]
    fn test_message_with_attachment_is_mixed_multipart() {
        let email = OutboundEmail::builder()
            .from_name("Career Portal")
            .to("hr@example.com")
            .subject("Application")
            .html("<p>cv attached</p>")
            .attach("cv.pdf", "/unused")
            .build()
            .unwrap();
        let files = vec![LoadedAttachment {
            filename: "cv.pdf".into(),
            content_type: content_type_for("cv.pdf").unwrap(),
            body: b"%PDF-1.4".to_vec(),
        }];

        let text = formatted(&build_message(&account(), &email, files).unwrap());

        assert!(text.contains("multipart/mixed"));
        assert!(text.contains("filename=\"cv.pdf\""));
        assert!(text.contains("application/pdf"));
    }

    #[test]
    fn test_parse_mailbox_accepts_display_names_and_padding() {
        assert!(parse_mailbox(" visitor@example.org ").is_ok());
        assert!(parse_mailbox("Asha Rao <asha@example.com>").is_ok());
        assert!(matches!(
            parse_mailbox("asha at example dot com"),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let email = OutboundEmail::builder()
            .from_name("Career Portal")
            .to("not an address")
            .subject("s")
            .html("b")
            .build()
            .unwrap();

        let result = build_message(&account(), &email, Vec::new());
        assert!(matches!(result, Err(MailError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_missing_attachment_file_surfaces_error() {
        let missing = vec![EmailAttachment {
            filename: "cv.pdf".into(),
            path: "/definitely/not/here".into(),
        }];
        let result = load_attachments(&missing).await;
        assert!(matches!(result, Err(MailError::Attachment { .. })));
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = MailConfig {
            user: "relay@example.com".into(),
            password: "hunter2".into(),
            host: "smtp.gmail.com".into(),
            port: 465,
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
