//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAdminWs`] -- Same, but also accepts `?token=` for
//!   WebSocket upgrades, where browsers cannot set headers.

pub mod auth;
pub mod rbac;
