//! Domain logic for the Flash onboarding survey and waitlist.
//!
//! Everything in this crate is pure: no database, no network. The `db`,
//! `events` and `api` crates build on these types.

pub mod error;
pub mod export;
pub mod flow;
pub mod form;
pub mod review;
pub mod survey;
pub mod table;
pub mod types;
pub mod validation;
