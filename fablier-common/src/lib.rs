//! # Fablier Common Library
//!
//! Shared code for the Fablier companion service:
//! - Error taxonomy
//! - Configuration loading
//! - Database initialization, schema, and catalog seeding
//! - Row models shared between handlers and db modules

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
