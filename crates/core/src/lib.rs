//! Folio catalog core.
//!
//! Holds the photo catalog domain model, the adapter contracts for the
//! external collaborators (document store, asset upload, authentication,
//! message relay), and the two client-facing workflows that share the
//! catalog: the admin workflow controller and the public gallery engine.
//!
//! Nothing in this crate knows about HTTP or SQL; the `folio-db`,
//! `folio-relay` and `folio-api` crates provide concrete adapters.

pub mod admin;
pub mod auth;
pub mod contact;
pub mod error;
pub mod gallery;
pub mod memory;
pub mod photo;
pub mod store;
pub mod types;
pub mod upload;
pub mod vocabulary;

#[cfg(test)]
pub(crate) mod test_support;
