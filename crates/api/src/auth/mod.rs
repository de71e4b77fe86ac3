//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`admin`] -- the configured administrator account.
//! - [`session`] -- revocation list for logged-out tokens.

pub mod admin;
pub mod jwt;
pub mod password;
pub mod session;
