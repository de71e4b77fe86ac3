//! Contact-message delivery via SMTP.
//!
//! [`EmailRelay`] wraps the `lettre` async SMTP transport and sends each
//! contact message as a plain-text email to the portfolio owner, with the
//! visitor's address set as `Reply-To`. If `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no relay should be built.

use async_trait::async_trait;
use folio_core::contact::{ContactMessage, MessageRelay};
use folio_core::error::CoreError;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

impl From<EmailError> for CoreError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::Address(e) => CoreError::Validation(format!("invalid email address: {e}")),
            other => CoreError::RelayFailed(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_ADDRESS: &str = "noreply@folio.local";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Where contact messages are delivered.
    pub to_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` or `CONTACT_TO` is not set.
    ///
    /// | Variable        | Required | Default               |
    /// |-----------------|----------|-----------------------|
    /// | `SMTP_HOST`     | yes      |                       |
    /// | `CONTACT_TO`    | yes      |                       |
    /// | `SMTP_PORT`     | no       | `587`                 |
    /// | `SMTP_FROM`     | no       | `noreply@folio.local` |
    /// | `SMTP_USER`     | no       |                       |
    /// | `SMTP_PASSWORD` | no       |                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let to_address = std::env::var("CONTACT_TO").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            to_address,
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailRelay
// ---------------------------------------------------------------------------

pub struct EmailRelay {
    config: EmailConfig,
}

impl EmailRelay {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Assemble the outgoing email without sending it.
    pub fn build_message(&self, message: &ContactMessage) -> Result<lettre::Message, EmailError> {
        use lettre::message::{header::ContentType, Mailbox};

        let reply_to = Mailbox::new(Some(message.name.clone()), message.email.parse()?);
        let body = format!(
            "From: {} <{}>\nSubject: {}\n\n{}",
            message.name, message.email, message.subject, message.message
        );

        lettre::Message::builder()
            .from(self.config.from_address.parse()?)
            .reply_to(reply_to)
            .to(self.config.to_address.parse()?)
            .subject(format!("[Portfolio] {}", message.subject))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))
    }

    async fn deliver(&self, message: &ContactMessage) -> Result<(), EmailError> {
        use lettre::{
            transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
            Tokio1Executor,
        };

        let email = self.build_message(message)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        transport_builder.build().send(email).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageRelay for EmailRelay {
    async fn send(&self, message: &ContactMessage) -> Result<(), CoreError> {
        match self.deliver(message).await {
            Ok(()) => {
                tracing::info!(subject = %message.subject, "Contact email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Contact email delivery failed");
                Err(e.into())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
