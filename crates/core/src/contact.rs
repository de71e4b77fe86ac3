//! Contact message model, the relay contract, and the contact form flow.
//!
//! Not part of the catalog, but it follows the same request/response/toast
//! pattern and reports failures through the same [`CoreError`] taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactMessage {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, max = 200, message = "subject is required"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "message is required"))]
    pub message: String,
}

impl ContactMessage {
    /// Field checks run before the relay is called.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(describe_errors(&e)))?;
        for (field, value) in [
            ("name", &self.name),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            crate::photo::require_non_empty(field, value)?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait MessageRelay: Send + Sync {
    /// Deliver the message. Failures surface as `RelayFailed`.
    async fn send(&self, message: &ContactMessage) -> Result<(), CoreError>;
}

/// Flatten validator output into one deterministic, human-readable line.
pub(crate) fn describe_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            errs.first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"))
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

// ---------------------------------------------------------------------------
// Form flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ContactPhase {
    #[default]
    Idle,
    Sending,
    Sent,
    Failed(String),
}

/// Client-side state of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub values: ContactMessage,
    pub phase: ContactPhase,
}

impl ContactForm {
    /// Validate, relay, then reset on success or keep the values on failure.
    pub async fn submit(&mut self, relay: &dyn MessageRelay) -> Result<(), CoreError> {
        if let Err(e) = self.values.check() {
            self.phase = ContactPhase::Failed(e.user_message());
            return Err(e);
        }

        self.phase = ContactPhase::Sending;
        match relay.send(&self.values).await {
            Ok(()) => {
                tracing::info!(subject = %self.values.subject, "Contact message relayed");
                self.values = ContactMessage::default();
                self.phase = ContactPhase::Sent;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Contact message relay failed");
                self.phase = ContactPhase::Failed(e.user_message());
                Err(e)
            }
        }
    }
}
