//! Outbound contact-message relays.
//!
//! Two [`MessageRelay`](folio_core::contact::MessageRelay) implementations:
//! - [`email::EmailRelay`] sends the message over SMTP.
//! - [`form::FormRelay`] posts it as JSON to a hosted form endpoint.

pub mod email;
pub mod form;

pub use email::{EmailConfig, EmailRelay};
pub use form::FormRelay;
