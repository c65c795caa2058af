//! Roster domain core.
//!
//! Shared types, domain errors, and the field validation engine. Nothing in
//! this crate touches the database; persistence is injected through the
//! collaborator traits in [`validation`].

pub mod error;
pub mod types;
pub mod validation;
