//! Authentication primitives for the admin dashboard.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;

/// Role carried by tokens issued to the dashboard admin.
pub const ROLE_ADMIN: &str = "admin";
