//! Configuration management for twinpane.
//!
//! User preferences ([`settings::Config`]) are stored as TOML and loaded at
//! startup, then turned into the explicit [`session::Session`] context the
//! components are built from.

pub mod session;
pub mod settings;
